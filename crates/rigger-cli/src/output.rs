//! Table and JSON rendering for CLI results.

use anyhow::Result;
use console::style;
use serde::Serialize;

use rigger_core::installer::{BatchEntry, InstallReport, LifecycleOutcome, UninstallReport};
use rigger_core::status::InstallStatus;

use crate::OutputFormat;

pub fn print_names(names: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for name in names {
                println!("{name}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(names)?),
    }
    Ok(())
}

pub fn print_status(unit: &str, status: InstallStatus, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}: {}", unit, styled_status(status)),
        OutputFormat::Json => {
            let output = serde_json::json!({ "unit": unit, "status": status });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Print install results and return how many units are not installed.
pub fn print_install_entries(
    entries: &[BatchEntry<InstallReport>],
    format: OutputFormat,
) -> Result<usize> {
    let failures = entries
        .iter()
        .filter(|e| !e.result.as_ref().is_ok_and(InstallReport::succeeded))
        .count();

    match format {
        OutputFormat::Table => {
            for entry in entries {
                match &entry.result {
                    Ok(report) if report.outcome == LifecycleOutcome::NoOp => {
                        println!("• {} already installed", report.unit);
                    }
                    Ok(report) => {
                        let mark = if report.succeeded() { "✓" } else { "✗" };
                        println!("{} {}: {}", mark, report.unit, styled_status(report.status));
                        if let Some(failure) = &report.step_failure {
                            println!("  ⚠ {}", failure);
                        }
                    }
                    Err(err) => println!("{} {}: {}", style("✗").red(), entry.unit, err),
                }
            }
        }
        OutputFormat::Json => print_json_entries(entries)?,
    }
    Ok(failures)
}

/// Print uninstall results and return how many units were not confirmed removed.
pub fn print_uninstall_entries(
    entries: &[BatchEntry<UninstallReport>],
    format: OutputFormat,
) -> Result<usize> {
    let failures = entries
        .iter()
        .filter(|e| !e.result.as_ref().is_ok_and(UninstallReport::succeeded))
        .count();

    match format {
        OutputFormat::Table => {
            for entry in entries {
                match &entry.result {
                    Ok(report) if report.outcome == LifecycleOutcome::NoOp => {
                        println!("• {} does not appear to be installed", report.unit);
                    }
                    Ok(report) => {
                        let mark = if report.succeeded() { "✓" } else { "✗" };
                        println!("{} {}: {}", mark, report.unit, styled_status(report.status));
                    }
                    Err(err) => println!("{} {}: {}", style("✗").red(), entry.unit, err),
                }
            }
        }
        OutputFormat::Json => print_json_entries(entries)?,
    }
    Ok(failures)
}

fn print_json_entries<T: Serialize>(entries: &[BatchEntry<T>]) -> Result<()> {
    let output: Vec<serde_json::Value> = entries
        .iter()
        .map(|entry| match &entry.result {
            Ok(report) => serde_json::json!({ "unit": entry.unit, "report": report }),
            Err(err) => serde_json::json!({ "unit": entry.unit, "error": err.to_string() }),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn styled_status(status: InstallStatus) -> console::StyledObject<String> {
    let text = status.to_string();
    match status {
        InstallStatus::Installed => style(text).green(),
        InstallStatus::NotInstalled => style(text).red(),
        InstallStatus::Unknown => style(text).yellow(),
    }
}

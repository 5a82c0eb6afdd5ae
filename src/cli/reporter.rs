// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::exporter::ExportReport;
use crate::gdml::ReferenceReport;
use crate::utils::math::format_number;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished export
    pub fn report_export(
        input: &str,
        output: &str,
        report: &ExportReport,
        duration: Duration,
    ) {
        Self::rule();
        println!(
            "{} {} {} {}",
            "Exported:".bold(),
            input.cyan(),
            "->".bright_black(),
            output.cyan()
        );
        Self::rule();

        println!(
            "  {} {}",
            "Solids:".bright_black(),
            report.solids.to_string().cyan()
        );
        println!(
            "  {} {}",
            "Volumes:".bright_black(),
            report.volumes.to_string().cyan()
        );
        println!(
            "  {} {}",
            "World:".bright_black(),
            Self::format_size(&report.world_size).cyan()
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );

        if !report.skipped.is_empty() {
            println!(
                "  {} {}",
                "Skipped:".bright_black(),
                report.skipped.join(", ").yellow()
            );
        }
        for warning in &report.warnings {
            Self::report_warning(warning);
        }
        Self::rule();
    }

    /// Report the reference check of a GDML file. Returns whether it passed.
    pub fn report_check(file: &str, report: &ReferenceReport) -> bool {
        Self::rule();
        println!("{} {}", "Checked:".bold(), file.cyan());
        Self::rule();

        if report.is_ordered() {
            println!("{} {}", "✅".green(), "No forward references".green().bold());
        } else {
            println!(
                "{} {}",
                "❌".red(),
                format!("{} forward reference(s)", report.forward.len()).red().bold()
            );
            for reference in &report.forward {
                println!(
                    "  {} {}",
                    format!("<{} {}>", reference.element, reference.attribute).bright_black(),
                    reference.target.red()
                );
            }
        }

        if !report.unresolved.is_empty() {
            println!(
                "\n{}",
                format!(
                    "{} name(s) defined outside the document:",
                    report.unresolved.len()
                )
                .yellow()
            );
            let mut targets: Vec<&str> =
                report.unresolved.iter().map(|r| r.target.as_str()).collect();
            targets.sort_unstable();
            targets.dedup();
            println!("  {}", targets.join(", ").bright_black());
        }
        Self::rule();
        report.is_ordered()
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn rule() {
        println!("{}", "━".repeat(80).bright_black());
    }

    fn format_size(size: &[f64; 3]) -> String {
        format!(
            "{} x {} x {} mm",
            format_number(size[0]),
            format_number(size[1]),
            format_number(size[2])
        )
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(Reporter::format_size(&[240.0, 40.0, 40.5]), "240 x 40 x 40.5 mm");
    }

    #[test]
    fn test_check_result_follows_ordering() {
        assert!(Reporter::report_check("ok.gdml", &ReferenceReport::default()));
    }
}

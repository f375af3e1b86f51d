// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::runner::RunReport;
use crate::io::ObjDocument;
use colored::*;
use std::path::Path;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished flattening run
    pub fn report_run(mesh: &Path, report: &RunReport) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Flattened:".bold(), mesh.display().to_string().cyan());
        println!("{}", "━".repeat(80).bright_black());

        println!("\n{}", "Faces:".bold());
        Self::print_count("Processed", report.faces_processed);
        println!(
            "  {} {}",
            "Claimed:".bright_black(),
            report.faces_claimed.to_string().green()
        );
        println!(
            "  {} {}",
            "Rejected:".bright_black(),
            Self::warn_if_nonzero(report.faces_rejected)
        );
        Self::print_count("No candidates", report.faces_without_candidates);
        println!(
            "  {} {}",
            "Skipped:".bright_black(),
            Self::warn_if_nonzero(report.skipped_faces.len())
        );
        for skipped in &report.skipped_faces {
            println!(
                "    {} face {}: {}",
                "⚠️".yellow(),
                skipped.face,
                skipped.reason.bright_black()
            );
        }

        println!("\n{}", "Mesh:".bold());
        Self::print_kept("Vertices", report.vertices_kept, report.vertices_removed);
        Self::print_kept("Faces", report.faces_kept, report.faces_removed);

        if !report.materials.is_empty() {
            println!("\n{}", "Materials:".bold());
            for placement in &report.materials {
                println!(
                    "  {} {}/{} faces kept, now after face {}",
                    format!("{}:", placement.name).bright_black(),
                    placement.kept_faces.to_string().cyan(),
                    placement.faces,
                    placement.new_faces_before
                );
            }
        }

        println!(
            "\n  {} {}",
            "Output:".bright_black(),
            report.output.display().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(report.duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report the contents of a mesh file
    pub fn report_inspect(file: &Path, document: &ObjDocument) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Mesh:".bold(), file.display().to_string().cyan());
        println!("{}", "━".repeat(80).bright_black());
        Self::print_count("Vertices", document.vertex_count());
        Self::print_count("Faces", document.face_count());

        let markers = document.material_markers();
        Self::print_count("Material markers", markers.len());
        for name in markers {
            println!("    {}", name.bright_black());
        }
        if let Some(library) = document.material_library() {
            println!("  {} {}", "Material file:".bright_black(), library.cyan());
        }
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn print_count(name: &str, value: usize) {
        println!(
            "  {} {}",
            format!("{}:", name).bright_black(),
            value.to_string().cyan()
        );
    }

    fn print_kept(name: &str, kept: usize, removed: usize) {
        println!(
            "  {} {} kept, {} removed",
            format!("{}:", name).bright_black(),
            kept.to_string().green(),
            removed.to_string().red()
        );
    }

    fn warn_if_nonzero(value: usize) -> ColoredString {
        if value > 0 {
            value.to_string().yellow()
        } else {
            value.to_string().green()
        }
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

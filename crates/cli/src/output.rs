//! Terminal rendering

use colored::Colorize;
use complex::TopologyReport;
use orchestrator::{Action, ExecutionSummary, Plan};

/// Output handler for terminal display
pub struct OutputHandler {
    pub color: bool,
}

impl OutputHandler {
    pub fn new(color: bool) -> Self {
        if !color {
            colored::control::set_override(false);
        }
        Self { color }
    }

    /// Print a section header
    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", format!("▶ {}", text).bright_yellow().bold());
        println!("{}", "─".repeat(60).dimmed());
    }

    pub fn print_success(&self, text: &str) {
        println!("{} {}", "✓".bright_green(), text.bright_white());
    }

    pub fn print_warning(&self, text: &str) {
        println!("{} {}", "⚠".bright_yellow(), text.yellow());
    }

    pub fn print_info(&self, text: &str) {
        println!("{} {}", "ℹ".bright_blue(), text);
    }

    /// Print each action on its own numbered line
    pub fn print_plan(&self, plan: &Plan<String>) {
        self.print_header(&format!("Plan for {}", plan.complex_name));
        for (step, action) in plan.iter().enumerate() {
            let kind = match action {
                Action::CreateNetwork { .. } => action.kind().bright_cyan(),
                Action::Attach { .. } => action.kind().bright_green(),
                Action::DisconnectDefault { .. } => action.kind().yellow(),
                Action::Start { .. } => action.kind().bright_magenta(),
            };
            println!("  {:>3}  {:<18} {}", step.to_string().dimmed(), kind, action);
        }
    }

    pub fn print_summary(&self, summary: &ExecutionSummary) {
        self.print_success(&format!(
            "{} networks created, {} attachments, {} resources started",
            summary.networks.len(),
            summary.attached,
            summary.started
        ));
    }

    pub fn print_report(&self, report: &TopologyReport) {
        self.print_header("Topology");
        println!("  {} {}", "Container count:".dimmed(), report.vertex_count);
        println!("  {} {}", "Network count:".dimmed(), report.network_count);
        println!("  {} {}", "Connected networks count:".dimmed(), report.components);
        println!("  {} {}", "Euler characteristic:".dimmed(), report.euler_characteristic);

        if !report.holes.is_empty() {
            println!("  {}", "Hole count:".dimmed());
            for hole in &report.holes {
                let count = if hole.count > 0 {
                    hole.count.to_string().bright_yellow()
                } else {
                    hole.count.to_string().normal()
                };
                println!("    - {}D: {}", hole.dim, count);
            }
        }

        if !report.minimal_paths.is_empty() {
            println!("  {}", "Minimal paths around 1-dimensional holes:".dimmed());
            for path in &report.minimal_paths {
                println!("    - {}", path.bright_white());
            }
        }
    }
}

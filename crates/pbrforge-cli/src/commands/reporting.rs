use colored::Colorize;
use pbrforge_texture::batch::{BatchSummary, ItemStatus};
use std::process::ExitCode;

/// Exit code for a finished batch: 2 when any item failed.
pub(crate) fn exit_code(summary: &BatchSummary) -> ExitCode {
    if summary.has_errors() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

pub(crate) fn print_header(title: &str) {
    println!("{}", "======================================".cyan());
    println!("{}", format!("  {}", title).cyan());
    println!("{}", "======================================".cyan());
    println!();
}

/// Print per-item lines and the status counts.
pub(crate) fn print_summary(title: &str, summary: &BatchSummary, runtime_seconds: f64) {
    for item in &summary.items {
        let status = match item.status {
            ItemStatus::Success => "SUCCESS".green(),
            ItemStatus::Skipped => "SKIPPED".yellow(),
            ItemStatus::Error => "FAILED".red(),
            ItemStatus::DryRun => "DRY-RUN".blue(),
        };
        match &item.message {
            Some(message) => println!("  {} {:20} {}", status, item.material, message.dimmed()),
            None => println!(
                "  {} {:20} {}",
                status,
                item.material,
                format!("{} files", item.files.len()).dimmed()
            ),
        }
    }

    println!();
    println!("{}", format!("{}:", title).cyan().bold());
    println!("  {:20} {}", "Total:".blue().bold(), summary.items.len());
    println!("  {:20} {}", "Successful:".green().bold(), summary.succeeded());
    println!("  {:20} {}", "Failed:".red().bold(), summary.failed());
    println!("  {:20} {}", "Skipped:".yellow().bold(), summary.skipped());
    if summary.dry_run() > 0 {
        println!("  {:20} {}", "Dry run:".blue().bold(), summary.dry_run());
    }
    println!("  {:20} {:.2}s", "Total runtime:".blue().bold(), runtime_seconds);
}

use colored::Colorize;

use dcv_core::{Outcome, Report};

/// Terminal summary: one line per processed domain plus outcome tallies.
pub fn render(report: &Report) {
    println!("\nDomain validation complete:");
    println!("---------------------------");

    if report.is_empty() {
        println!("No domains processed.");
        return;
    }

    for (name, outcome) in report.iter() {
        let status = match outcome {
            Outcome::Validated => "validated".green(),
            Outcome::AlreadyValid => "already valid".green(),
            Outcome::TimedOut => "timed out".yellow(),
            Outcome::Failed => "failed".red(),
            Outcome::Error(reason) => format!("error: {}", reason).red(),
        };
        println!("{:<40} {}", name, status);
    }

    let counts = report.counts();
    println!(
        "\n{} validated, {} already valid, {} failed, {} timed out, {} errors",
        counts.validated, counts.already_valid, counts.failed, counts.timed_out, counts.errors
    );
}

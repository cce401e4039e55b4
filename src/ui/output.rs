use crate::linker::LinkStats;
use crate::router::{BatchReport, ImportOutcome};
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::CLOUD, text.style(theme().header));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info),
        label.style(theme().dim),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header));
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim), value);
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted).to_string()
}

pub fn link_stats(stats: &LinkStats) {
    println!(
        "{} {} roles × {} resources → {} access edges",
        Icons::LINK.style(theme().info),
        stats.roles,
        stats.resources,
        stats.edges
    );
}

/// One line per import; `label` is the caller's label, not the category tag
pub fn import_outcome(label: &str, outcome: &ImportOutcome) {
    match outcome {
        ImportOutcome::Imported { category, records, link } => {
            println!(
                "{} {} {} ({} records)",
                Icons::IMPORT,
                label.style(theme().label),
                muted(&format!("[{}]", category)),
                records
            );
            if let Some(stats) = link {
                link_stats(stats);
            }
        }
        ImportOutcome::Ignored { category } => {
            println!(
                "{} {} {}",
                Icons::SKIP,
                label.style(theme().label),
                muted(&format!("[{}, informational]", category))
            );
        }
    }
}

pub fn batch_report(report: &BatchReport) {
    for entry in &report.entries {
        match &entry.result {
            Ok(outcome) => import_outcome(&entry.label, outcome),
            Err(e) => error(&format!("{}: {}", entry.label, e)),
        }
    }

    match &report.linking {
        Some(Ok(stats)) => link_stats(stats),
        Some(Err(e)) => error(&format!("linking pass: {}", e)),
        None => {}
    }

    section("Summary");
    summary_row("Entries:", &report.entries.len().to_string());
    summary_row("Imported:", &report.imported().to_string());
    summary_row("Failed:", &report.failures().count().to_string());
}

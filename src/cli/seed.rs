//! Sample data command

use feedback_triage::{
    error::Result,
    seed::{SeedItem, SeedOutcome, Seeder, SEED_ITEMS},
};
use tracing::debug;

/// Characters of feedback text echoed per line
const PREVIEW_CHARS: usize = 60;

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// One report line per item; failures come back as `Err` for stderr
fn outcome_line(item: &SeedItem, outcome: &SeedOutcome) -> std::result::Result<String, String> {
    match outcome {
        SeedOutcome::Created { id } => Ok(format!(
            " ✓ id={} [{}] {}",
            id,
            item.source,
            preview(item.text)
        )),
        SeedOutcome::Rejected { status, error } => Err(format!(" ✗ {}: {}", status, error)),
        SeedOutcome::Failed { error } => Err(format!(" ✗ request failed: {}", error)),
    }
}

/// Handle seed command
pub async fn handle(url: String) -> Result<()> {
    let seeder = Seeder::new(&url)?;
    debug!("Seeding {} items to {}", SEED_ITEMS.len(), seeder.endpoint());

    println!("Seeding {} feedback items to {}\n", SEED_ITEMS.len(), url);

    let report = seeder.run(SEED_ITEMS).await;
    for (item, outcome) in &report.outcomes {
        match outcome_line(item, outcome) {
            Ok(line) => println!("{}", line),
            Err(line) => eprintln!("{}", line),
        }
    }

    println!(
        "\nDone: {} created, {} failed. View the ranked summary at {}/summary",
        report.created(),
        report.failed(),
        url.trim_end_matches('/')
    );
    Ok(())
}

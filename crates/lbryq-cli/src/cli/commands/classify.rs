//! `lbryq classify <query>` – offline classification.

use anyhow::Result;
use lbryq_core::classify::{analyze, Classification};

pub fn run_classify(query: &str, json: bool) -> Result<()> {
    let analysis = analyze(query);
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let (kind, value) = match &analysis.classification {
        Classification::Inert => ("inert", ""),
        Classification::Locator(path) => ("locator", path.as_str()),
        Classification::FreeText(term) => ("free-text", term.as_str()),
    };
    println!("{:<16} {}", "classification", kind);
    if !value.is_empty() {
        println!("{:<16} {}", "value", value);
    }
    println!("{:<16} {}", "normalized", analysis.normalized_term);
    println!(
        "{:<16} {}",
        "claim id",
        analysis.claim_id.as_deref().unwrap_or("-")
    );
    Ok(())
}

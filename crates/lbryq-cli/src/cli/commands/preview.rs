//! `lbryq preview <draft.json>` – publish confirmation summary.

use anyhow::{Context, Result};
use lbryq_core::config::LbryqConfig;
use lbryq_core::i18n;
use lbryq_core::publish_preview::PublishDraft;
use std::path::Path;

pub fn run_preview(cfg: &LbryqConfig, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let draft: PublishDraft = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse draft {}", path.display()))?;
    let t = i18n::translator_for(cfg.locale_file.as_deref())?;

    let preview = draft.preview(t.as_ref());
    println!("{}", preview.title);
    for row in &preview.rows {
        println!("  {:<12} {}", row.label, row.value);
    }
    if let Some((label, fee)) = &preview.tx_fee {
        println!("  {} {}", label, fee);
    }
    println!();
    println!("{}", preview.irreversible_notice);
    println!(
        "[{}] {}",
        if preview.skip_preview_checked { "x" } else { " " },
        preview.skip_preview_label
    );

    let action = draft.confirm();
    tracing::debug!(file = %action.file_name, "preview confirmed action");
    println!("{}: {}", preview.confirm_label, action.file_name);
    Ok(())
}

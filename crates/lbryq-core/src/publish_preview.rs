//! Confirmation summary shown before a publish (or edit) is sent.

use serde::{Deserialize, Serialize};

use crate::i18n::Translator;

/// Shown for an unset file or deposit.
const PLACEHOLDER: &str = "---";

/// File chosen for upload: a local path, or a browser file known only by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileSource {
    Path(String),
    Web { name: String },
}

impl FileSource {
    fn is_set(&self) -> bool {
        match self {
            FileSource::Path(p) => !p.is_empty(),
            FileSource::Web { .. } => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: String,
    pub currency: String,
}

/// Publish form state the preview summarizes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishDraft {
    pub file: Option<FileSource>,
    pub optimize: bool,
    pub title: Option<String>,
    pub channel: Option<String>,
    /// Deposit in LBC.
    pub bid: Option<f64>,
    pub uri: Option<String>,
    pub content_is_free: bool,
    pub fee: Fee,
    pub is_vid: bool,
    pub ffmpeg_available: bool,
    /// `total_fee` from the dry-run publish response.
    pub total_fee: Option<String>,
    pub enable_publish_preview: bool,
    pub is_still_editing: bool,
}

/// File name passed to publish: the path, the web file's name, or `---`.
pub fn resolve_file_name(file: Option<&FileSource>) -> String {
    match file {
        Some(FileSource::Path(p)) if !p.is_empty() => p.clone(),
        Some(FileSource::Web { name }) => name.clone(),
        _ => PLACEHOLDER.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishPreview {
    pub title: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub rows: Vec<PreviewRow>,
    /// "Est. transaction fee:" label and amount, when the dry run reported one.
    pub tx_fee: Option<(String, String)>,
    pub irreversible_notice: String,
    pub skip_preview_label: String,
    pub skip_preview_checked: bool,
}

/// What confirming the preview does: publish for real.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishAction {
    pub file_name: String,
    pub preview: bool,
}

fn format_bid(bid: Option<f64>) -> String {
    match bid {
        Some(b) if b != 0.0 && !b.is_nan() => format!("{b} LBC"),
        _ => PLACEHOLDER.to_string(),
    }
}

impl PublishDraft {
    fn optimize_available(&self) -> bool {
        self.file.as_ref().is_some_and(FileSource::is_set) && self.is_vid && self.ffmpeg_available
    }

    pub fn preview(&self, t: &dyn Translator) -> PublishPreview {
        let (title, confirm) = if self.is_still_editing {
            ("Confirm Edit", "Save")
        } else {
            ("Confirm Publish", "Publish")
        };
        let row = |label: &str, value: String| PreviewRow {
            label: t.translate(label),
            value,
        };

        let price = if self.content_is_free {
            t.translate("Free")
        } else {
            format!("{} {}", self.fee.amount, self.fee.currency)
        };
        let mut rows = vec![
            row("Title", self.title.clone().unwrap_or_default()),
            row("Channel", self.channel.clone().unwrap_or_default()),
            row("URL", self.uri.clone().unwrap_or_default()),
            row("Deposit", format_bid(self.bid)),
            row("Price", price),
        ];
        if self.optimize_available() {
            let answer = if self.optimize { "Yes" } else { "No" };
            rows.push(row("Transcode", t.translate(answer)));
        }

        PublishPreview {
            title: t.translate(title),
            confirm_label: t.translate(confirm),
            cancel_label: t.translate("Cancel"),
            rows,
            tx_fee: self
                .total_fee
                .as_ref()
                .filter(|f| !f.is_empty())
                .map(|f| (t.translate("Est. transaction fee:"), format!("{f} LBC"))),
            irreversible_notice: t.translate("Once the transaction is sent, it cannot be reversed."),
            skip_preview_label: t.translate("Skip preview and confirmation"),
            skip_preview_checked: !self.enable_publish_preview,
        }
    }

    pub fn confirm(&self) -> PublishAction {
        PublishAction {
            file_name: resolve_file_name(self.file.as_ref()),
            preview: false,
        }
    }

    /// Flip the "show this preview" setting; returns the new value.
    pub fn toggle_preview(&mut self) -> bool {
        self.enable_publish_preview = !self.enable_publish_preview;
        self.enable_publish_preview
    }
}

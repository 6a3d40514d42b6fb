//! UI string translation, passed explicitly to the page models.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Translates UI strings keyed by their English text.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;

    /// Translate then substitute `%name%` placeholders in one pass.
    /// Substituted values are never scanned again.
    fn translate_with(&self, key: &str, vars: &[(&str, &str)]) -> String {
        interpolate(&self.translate(key), vars)
    }
}

fn interpolate(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let value = after.find('%').and_then(|end| {
            let name = &after[..end];
            vars.iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| (*v, end))
        });
        match value {
            Some((v, end)) => {
                out.push_str(v);
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Returns keys unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Translator for Passthrough {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// String catalog loaded from a flat JSON object (`{"Yes": "Oui", ...}`).
/// Missing or empty entries fall back to the key.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    strings: HashMap<String, String>,
}

impl Catalog {
    pub fn from_map(strings: HashMap<String, String>) -> Self {
        Self { strings }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("read catalog {}", path.display()))?;
        let strings: HashMap<String, String> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse catalog {}", path.display()))?;
        tracing::debug!(entries = strings.len(), "loaded string catalog {}", path.display());
        Ok(Self { strings })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        match self.strings.get(key) {
            Some(s) if !s.is_empty() => s.clone(),
            _ => key.to_string(),
        }
    }
}

/// Translator for an optional catalog path: the catalog if given, else passthrough.
pub fn translator_for(locale_file: Option<&Path>) -> Result<Box<dyn Translator>> {
    match locale_file {
        Some(path) => Ok(Box::new(Catalog::load(path)?)),
        None => Ok(Box::new(Passthrough)),
    }
}

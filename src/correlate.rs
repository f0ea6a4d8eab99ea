//! Correlation of documented rule entities with their diagram pairs.
//!
//! Entities are taken in document order. Each one is named after its first
//! heading, and each of its descriptive paragraphs contributes one rule
//! identifier, so an entity with `N` paragraphs appears `N` times in a row.

use crate::error::Result;
use crate::options::{IdentifierMode, PageLayout};
use crate::page::{Page, PageScan};
use serde::Serialize;
use std::fmt;

/// Name given to entities without a heading.
pub const UNKNOWN_NAME: &str = "unknown";

/// Key locating a diagram pair on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    /// Create an identifier from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Textual form used in file names.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A documented rule block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// 1-based position in the page
    pub index: usize,

    /// Sanitized heading text
    pub name: String,

    /// Number of descriptive paragraphs
    pub paragraphs: usize,
}

impl Entity {
    /// Identifier of this entity under `mode`.
    pub fn rule_id(&self, mode: IdentifierMode) -> RuleId {
        match mode {
            IdentifierMode::Ordinal => RuleId(self.index.to_string()),
            IdentifierMode::Name => RuleId(self.name.clone()),
        }
    }
}

/// Derive an entity name from its heading text.
///
/// The text is trimmed, spaces become underscores, and every occurrence of
/// `boilerplate` is removed. Without a heading the name is [`UNKNOWN_NAME`].
pub fn derive_name(heading: Option<&str>, boilerplate: &str) -> String {
    let Some(heading) = heading else {
        return UNKNOWN_NAME.to_string();
    };
    let name = heading.trim().replace(' ', "_");
    if boilerplate.is_empty() {
        name
    } else {
        name.replace(boilerplate, "")
    }
}

/// Entities of a scanned page, in document order.
pub fn entities(scan: &PageScan, layout: &PageLayout) -> Vec<Entity> {
    scan.entities
        .iter()
        .enumerate()
        .map(|(i, entity)| Entity {
            index: i + 1,
            name: derive_name(entity.heading.as_deref(), &layout.boilerplate),
            paragraphs: entity.paragraphs,
        })
        .collect()
}

/// One identifier per paragraph, in document order.
pub fn rule_ids(entities: &[Entity], mode: IdentifierMode) -> Vec<RuleId> {
    entities
        .iter()
        .flat_map(|entity| std::iter::repeat(entity.rule_id(mode)).take(entity.paragraphs))
        .collect()
}

/// Build the ordered identifier list of a page.
pub fn correlate(page: &Page, layout: &PageLayout, mode: IdentifierMode) -> Result<Vec<RuleId>> {
    let scan = page.scan(layout)?;
    Ok(rule_ids(&entities(&scan, layout), mode))
}

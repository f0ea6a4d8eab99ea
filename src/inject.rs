//! Injection of diagram containers into cross-reference pages.

use crate::asset::AssetPart;
use crate::correlate::{self, RuleId};
use crate::error::Result;
use crate::options::{IdentifierMode, PageLayout};
use crate::page::{checked_selector, DocumentState, Page};
use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings};

/// Outcome of [`inject_containers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// The page already holds images; nothing was changed.
    AlreadyProcessed,
    /// Containers were inserted, one per identifier.
    Injected {
        /// Identifiers in paragraph order
        rules: Vec<RuleId>,
    },
}

impl Injection {
    /// Whether the page was left untouched.
    pub fn is_already_processed(&self) -> bool {
        matches!(self, Injection::AlreadyProcessed)
    }

    /// Identifiers recorded by the injection, empty if skipped.
    pub fn rules(&self) -> &[RuleId] {
        match self {
            Injection::AlreadyProcessed => &[],
            Injection::Injected { rules } => rules,
        }
    }
}

/// Image reference of `part` of `rule`, relative to the index page.
pub fn image_path(rule: &RuleId, part: AssetPart, layout: &PageLayout) -> String {
    format!(
        "{}/{}",
        layout.image_subdir,
        part.file_name(rule, &layout.image_extension)
    )
}

/// Markup of the layout container placed after a paragraph.
pub fn container_markup(rule: &RuleId, layout: &PageLayout) -> String {
    let mut out = String::from(r#"<div class="grid-container">"#);
    for part in AssetPart::ALL {
        let path = image_path(rule, part, layout);
        log::info!("Adding image path {}", path);
        out.push_str(&format!(
            r#"<div class="swrl-container"><span class="swrl-label">{label}</span><img src="{src}" id="{id}" alt="SWRL {label}" title="SWRL {label}"></div>"#,
            label = part.label(),
            src = htmlize::escape_attribute(path),
            id = part.as_str(),
        ));
    }
    out.push_str("</div>");
    out
}

/// Insert a body/head container after every paragraph of every entity.
///
/// Returns [`Injection::AlreadyProcessed`] without mutating the page when an
/// entity already contains images.
pub fn inject_containers(
    page: &mut Page,
    layout: &PageLayout,
    mode: IdentifierMode,
) -> Result<Injection> {
    let scan = page.scan(layout)?;
    if scan.has_injected_images() {
        log::warn!(
            "Image tags already exist in {}. Skipping; generate the documentation again",
            page.path().display()
        );
        return Ok(Injection::AlreadyProcessed);
    }

    let rules = correlate::rule_ids(&correlate::entities(&scan, layout), mode);
    let containers: Vec<String> = rules
        .iter()
        .map(|rule| container_markup(rule, layout))
        .collect();

    let paragraph = checked_selector(layout.entity_child_selector("p"))?;
    let mut pending = containers.iter();
    let html = rewrite_str(
        page.html(),
        RewriteStrSettings {
            element_content_handlers: vec![element!(paragraph.as_str(), |el| {
                if let Some(container) = pending.next() {
                    el.after(container, ContentType::Html);
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;
    page.set_html(html);

    log::info!(
        "Image containers added to {} for {} paragraphs",
        page.path().display(),
        rules.len()
    );
    Ok(Injection::Injected { rules })
}

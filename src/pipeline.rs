//! Batch processing of one documentation tree.
//!
//! The phases run in a fixed order:
//!
//! 1. install the stylesheet and script (optional),
//! 2. inject containers into every cross-reference page,
//! 3. scale the diagram pair of every identifier recorded in phase 2,
//! 4. augment every index page.
//!
//! The identifier list of phase 2 comes from the first page that is actually
//! injected and is passed on to phase 3; it is never recomputed.

use crate::asset::{scale_pair, AssetPair};
use crate::correlate::RuleId;
use crate::error::{Error, Result};
use crate::head::{augment_index, IndexAugmentation};
use crate::inject::{inject_containers, Injection};
use crate::options::{IdentifierMode, ProcessOptions};
use crate::page::Page;
use crate::resources::install_resources;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// How rule identifiers were derived
    pub identifier_mode: IdentifierMode,

    /// Static resources written
    pub resources_installed: Vec<PathBuf>,

    /// Cross-reference pages that received containers
    pub pages_injected: Vec<PathBuf>,

    /// Cross-reference pages that already held images
    pub pages_skipped: Vec<PathBuf>,

    /// Identifiers recorded from the first injected page
    pub rules: Vec<RuleId>,

    /// Number of pair scaling passes, one per recorded identifier
    pub pairs_scaled: usize,

    /// Index pages that were augmented
    pub index_pages_updated: Vec<PathBuf>,

    /// Index pages that already linked the stylesheet
    pub index_pages_skipped: Vec<PathBuf>,
}

impl BatchReport {
    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Files directly inside `dir` whose name matches `pattern`, sorted by name.
///
/// A missing directory yields no pages.
pub fn discover_pages(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let re = Regex::new(pattern)
        .map_err(|e| Error::InvalidOption(format!("invalid page pattern {pattern:?}: {e}")))?;

    if !dir.is_dir() {
        log::warn!("Directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut pages = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if re.is_match(&entry.file_name().to_string_lossy()) {
            pages.push(entry.path());
        }
    }
    pages.sort();
    Ok(pages)
}

/// Inject containers into every cross-reference page.
pub fn inject_sections(options: &ProcessOptions, report: &mut BatchReport) -> Result<()> {
    let sections = options.sections_dir();
    let mut captured: Option<Vec<RuleId>> = None;

    for path in discover_pages(&sections, &options.crossref_pattern)? {
        log::info!("Processing file: {}", path.display());
        let mut page = Page::read(&path)?;

        match inject_containers(&mut page, &options.layout, options.identifier_mode)? {
            Injection::AlreadyProcessed => report.pages_skipped.push(path),
            Injection::Injected { rules } => {
                page.write()?;
                log::info!("HTML file modified: {}", path.display());
                if captured.is_none() && !rules.is_empty() {
                    captured = Some(rules);
                }
                report.pages_injected.push(path);
            }
        }
    }

    report.rules = captured.unwrap_or_default();
    Ok(())
}

/// Scale the diagram pair of every identifier in `rules`, in recorded order.
///
/// An identifier recorded once per paragraph is scaled once per paragraph,
/// so a compensated pair can be scaled again on a later pass. Returns the
/// number of passes. The first missing or malformed asset aborts the phase.
pub fn scale_assets(options: &ProcessOptions, rules: &[RuleId]) -> Result<usize> {
    let dir = options.asset_dir();
    let ext = &options.layout.image_extension;
    let mut scaled = 0;
    for rule in rules {
        let pair = AssetPair::locate(&dir, rule, ext);
        scale_pair(&pair, &options.scale)?;
        scaled += 1;
    }
    Ok(scaled)
}

/// Add the stylesheet, scripts, and load event to every index page.
pub fn augment_index_pages(options: &ProcessOptions, report: &mut BatchReport) -> Result<()> {
    for path in discover_pages(&options.target_dir, &options.index_pattern)? {
        log::info!("Processing index file: {}", path.display());
        let mut page = Page::read(&path)?;

        match augment_index(&mut page, &options.layout)? {
            IndexAugmentation::Skipped => report.index_pages_skipped.push(path),
            IndexAugmentation::Updated { .. } => {
                page.write()?;
                log::info!("Index page updated: {}", path.display());
                report.index_pages_updated.push(path);
            }
        }
    }
    Ok(())
}

/// Run every phase over the documentation tree of `options`.
pub fn process_directory(options: &ProcessOptions) -> Result<BatchReport> {
    options.validate()?;
    let mut report = BatchReport {
        identifier_mode: options.identifier_mode,
        ..BatchReport::default()
    };

    if options.install_resources {
        report.resources_installed = install_resources(options)?;
    }

    inject_sections(options, &mut report)?;

    if options.scale_assets {
        report.pairs_scaled = scale_assets(options, &report.rules)?;
    } else {
        log::debug!("Asset scaling disabled");
    }

    augment_index_pages(options, &mut report)?;

    log::info!(
        "Done: {} pages injected, {} skipped, {} pairs scaled, {} index pages updated",
        report.pages_injected.len(),
        report.pages_skipped.len(),
        report.pairs_scaled,
        report.index_pages_updated.len()
    );
    Ok(report)
}

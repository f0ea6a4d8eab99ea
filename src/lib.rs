//! # swrlimg
//!
//! Post-processing of Widoco ontology documentation: injects generated SWRL
//! rule diagrams into the cross-reference section and normalizes the size of
//! each body/head diagram pair.
//!
//! ## Quick Start
//!
//! ```no_run
//! use swrlimg::{process_directory, ProcessOptions};
//!
//! fn main() -> swrlimg::Result<()> {
//!     let options = ProcessOptions::new("doc").use_names(true).with_max_height(150);
//!     let report = process_directory(&options)?;
//!     println!("{} pairs scaled", report.pairs_scaled);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Correlation**: entities of `sections/crossref-*.html` are read in
//!   document order; each paragraph yields one rule identifier
//! - **Injection**: a body/head image container is placed after every
//!   paragraph, once per page
//! - **Scaling**: `rule_{id}-body.svg` / `rule_{id}-head.svg` get their
//!   intrinsic size rewritten by a shared, aspect-preserving factor
//! - **Head augmentation**: `index-*.html` pages link the stylesheet and
//!   scripts and re-dispatch the content-loaded event

pub mod asset;
pub mod correlate;
pub mod error;
pub mod head;
pub mod inject;
pub mod options;
pub mod page;
pub mod pipeline;
pub mod resources;

// Re-export commonly used types
pub use asset::{read_size, scale_pair, write_size, AssetPair, AssetPart, AssetSize, PairScale};
pub use correlate::{correlate, derive_name, Entity, RuleId};
pub use error::{Error, Result};
pub use head::{
    add_load_event, add_script_references, add_stylesheet_link, augment_index,
    IndexAugmentation, LinkOutcome, LoadEvent,
};
pub use inject::{inject_containers, Injection};
pub use options::{IdentifierMode, PageLayout, ProcessOptions, ScaleOptions};
pub use page::{DocumentState, Page, PageScan};
pub use pipeline::{discover_pages, process_directory, BatchReport};
pub use resources::install_resources;

use std::path::Path;

/// Inject containers into one cross-reference page on disk.
///
/// The page is rewritten only when containers were added.
///
/// # Example
///
/// ```no_run
/// use swrlimg::{inject_file, IdentifierMode, PageLayout};
///
/// let outcome = inject_file(
///     "doc/sections/crossref-en.html",
///     &PageLayout::default(),
///     IdentifierMode::Name,
/// )?;
/// println!("{} identifiers", outcome.rules().len());
/// # Ok::<(), swrlimg::Error>(())
/// ```
pub fn inject_file<P: AsRef<Path>>(
    path: P,
    layout: &PageLayout,
    mode: IdentifierMode,
) -> Result<Injection> {
    let mut page = Page::read(path)?;
    let outcome = inject_containers(&mut page, layout, mode)?;
    if !outcome.is_already_processed() {
        page.write()?;
    }
    Ok(outcome)
}

/// Scale the pair of `rule` found in `asset_dir`.
///
/// # Example
///
/// ```no_run
/// use swrlimg::{scale_rule, RuleId, ScaleOptions};
/// use std::path::Path;
///
/// let scale = scale_rule(Path::new("doc/swrlrules"), &RuleId::new("1"), "svg", &ScaleOptions::default())?;
/// println!("factor {}", scale.factor);
/// # Ok::<(), swrlimg::Error>(())
/// ```
pub fn scale_rule(
    asset_dir: &Path,
    rule: &RuleId,
    extension: &str,
    options: &ScaleOptions,
) -> Result<PairScale> {
    options.validate()?;
    scale_pair(&AssetPair::locate(asset_dir, rule, extension), options)
}

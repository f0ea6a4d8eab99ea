//! Generated documentation pages.
//!
//! A [`Page`] is the markup of one HTML file. It is read from disk, rewritten
//! in place by the injection and head passes, and written back to the same
//! path. Read-only questions about a page go through [`DocumentState`], which
//! [`PageScan`] answers from a single scanning pass.

mod scan;

pub use scan::{EntityScan, PageScan, ScriptScan, LOAD_EVENT_SHIM_ATTR};

pub(crate) use scan::checked_selector;

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// One HTML page of the documentation tree.
#[derive(Debug, Clone)]
pub struct Page {
    path: PathBuf,
    html: String,
}

impl Page {
    /// Read a page from disk.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let html = fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            html,
        })
    }

    /// Wrap markup that will be written to `path`.
    pub fn from_html(path: impl Into<PathBuf>, html: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            html: html.into(),
        }
    }

    /// Path the page was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current markup.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Replace the markup.
    pub fn set_html(&mut self, html: String) {
        self.html = html;
    }

    /// Scan the current markup.
    pub fn scan(&self, layout: &crate::PageLayout) -> Result<PageScan> {
        PageScan::of(&self.html, layout)
    }

    /// Write the markup back to the page's path.
    pub fn write(&self) -> Result<()> {
        fs::write(&self.path, &self.html)?;
        Ok(())
    }
}

/// Read-only queries deciding whether a pass has already run on a page.
pub trait DocumentState {
    /// Whether any entity block already contains an image.
    fn has_injected_images(&self) -> bool;

    /// Whether a link referencing `file_name` exists anywhere in the page.
    fn has_stylesheet_link(&self, file_name: &str) -> bool;

    /// Whether a script element references `file_name`.
    fn has_script_reference(&self, file_name: &str) -> bool;

    /// Whether the synthetic load event was already added.
    fn has_load_event(&self) -> bool;
}

//! Processing options and configuration.

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default name of the stylesheet installed into the resources directory.
pub const STYLESHEET_NAME: &str = "swrl-image.css";

/// Default name of the client scaling script.
pub const SCALE_SCRIPT_NAME: &str = "swrl-image-scale.js";

/// How a rule identifier is derived from an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierMode {
    /// 1-based position of the entity in the page
    #[default]
    Ordinal,
    /// Sanitized heading text of the entity
    Name,
}

/// Markup conventions of the generated documentation.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Id of the section holding the rule entities
    pub rules_section_id: String,

    /// Class of an entity block
    pub entity_class: String,

    /// Tag of the entity heading
    pub heading_tag: String,

    /// Substring removed from derived entity names
    pub boilerplate: String,

    /// Subdirectory (relative to the index page) holding the diagrams
    pub image_subdir: String,

    /// Diagram file extension, without the dot
    pub image_extension: String,

    /// Subdirectory holding the stylesheet and scripts
    pub resources_subdir: String,

    /// Stylesheet file name
    pub stylesheet: String,

    /// Script file names, added in order
    pub scripts: Vec<String>,

    /// Viewer initialisation call the load event must follow
    pub init_call: String,
}

impl PageLayout {
    /// Create a layout with the Widoco defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the boilerplate substring stripped from entity names.
    pub fn with_boilerplate(mut self, boilerplate: impl Into<String>) -> Self {
        self.boilerplate = boilerplate.into();
        self
    }

    /// Set the heading tag.
    pub fn with_heading_tag(mut self, tag: impl Into<String>) -> Self {
        self.heading_tag = tag.into();
        self
    }

    /// Set the image subdirectory.
    pub fn with_image_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.image_subdir = subdir.into();
        self
    }

    /// Set the image file extension (a leading dot is dropped).
    pub fn with_image_extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        self.image_extension = ext.trim_start_matches('.').to_string();
        self
    }

    /// Set the stylesheet file name.
    pub fn with_stylesheet(mut self, name: impl Into<String>) -> Self {
        self.stylesheet = name.into();
        self
    }

    /// Set the script file names.
    pub fn with_scripts<I, S>(mut self, scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scripts = scripts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the viewer initialisation call.
    pub fn with_init_call(mut self, call: impl Into<String>) -> Self {
        self.init_call = call.into();
        self
    }

    /// Selector of entity blocks inside the rules section.
    pub fn entity_selector(&self) -> String {
        format!("#{} .{}", self.rules_section_id, self.entity_class)
    }

    /// Selector of `tag` elements inside entity blocks.
    pub fn entity_child_selector(&self, tag: &str) -> String {
        format!("{} {}", self.entity_selector(), tag)
    }

    /// Reference to a file in the resources subdirectory.
    pub fn resource_href(&self, file_name: &str) -> String {
        format!("{}/{}", self.resources_subdir, file_name)
    }

    fn validate(&self) -> Result<()> {
        if self.image_extension.is_empty() {
            return Err(Error::InvalidOption(
                "image extension must not be empty".to_string(),
            ));
        }
        if self.heading_tag.is_empty() {
            return Err(Error::InvalidOption(
                "heading tag must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            rules_section_id: "swrlrules".to_string(),
            entity_class: "entity".to_string(),
            heading_tag: "h3".to_string(),
            boilerplate: "back_to_ToC".to_string(),
            image_subdir: "swrlrules".to_string(),
            image_extension: "svg".to_string(),
            resources_subdir: "resources".to_string(),
            stylesheet: STYLESHEET_NAME.to_string(),
            scripts: vec![SCALE_SCRIPT_NAME.to_string()],
            init_call: "loadTOC();".to_string(),
        }
    }
}

/// Parameters of the pair scaling algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleOptions {
    /// Target height bound
    pub max_height: f64,

    /// Below this factor the compensated fallback is used
    pub min_scale: f64,

    /// Bonus added to `max_height` by the fallback
    pub height_compensation: f64,
}

impl ScaleOptions {
    /// Create scale options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum height.
    pub fn with_max_height(mut self, max_height: f64) -> Self {
        self.max_height = max_height;
        self
    }

    /// Set the minimum scale threshold.
    pub fn with_min_scale(mut self, min_scale: f64) -> Self {
        self.min_scale = min_scale;
        self
    }

    /// Set the height compensation bonus.
    pub fn with_height_compensation(mut self, bonus: f64) -> Self {
        self.height_compensation = bonus;
        self
    }

    /// Reject a non-positive height bound.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_height.is_finite() && self.max_height > 0.0) {
            return Err(Error::InvalidOption(format!(
                "max height must be positive, got {}",
                self.max_height
            )));
        }
        Ok(())
    }
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            max_height: 100.0,
            min_scale: 0.12,
            height_compensation: 300.0,
        }
    }
}

/// Options for processing one documentation tree.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Root of the generated documentation
    pub target_dir: PathBuf,

    /// Identifier derivation
    pub identifier_mode: IdentifierMode,

    /// Markup conventions
    pub layout: PageLayout,

    /// Scaling parameters
    pub scale: ScaleOptions,

    /// Rewrite asset sizes after injection
    pub scale_assets: bool,

    /// Install the stylesheet and scripts before processing
    pub install_resources: bool,

    /// Diagram directory on disk (defaults to `target_dir/image_subdir`)
    pub asset_dir: Option<PathBuf>,

    /// File-name pattern of cross-reference pages
    pub crossref_pattern: String,

    /// File-name pattern of index pages
    pub index_pattern: String,
}

impl ProcessOptions {
    /// Create options for the documentation rooted at `target_dir`.
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            identifier_mode: IdentifierMode::default(),
            layout: PageLayout::default(),
            scale: ScaleOptions::default(),
            scale_assets: true,
            install_resources: true,
            asset_dir: None,
            crossref_pattern: r"^crossref-.*\.html$".to_string(),
            index_pattern: r"^index-.*\.html$".to_string(),
        }
    }

    /// Derive identifiers from entity names instead of ordinals.
    pub fn use_names(mut self, use_names: bool) -> Self {
        self.identifier_mode = if use_names {
            IdentifierMode::Name
        } else {
            IdentifierMode::Ordinal
        };
        self
    }

    /// Set the identifier mode.
    pub fn with_identifier_mode(mut self, mode: IdentifierMode) -> Self {
        self.identifier_mode = mode;
        self
    }

    /// Set the page layout.
    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the maximum diagram height.
    pub fn with_max_height(mut self, max_height: u32) -> Self {
        self.scale.max_height = f64::from(max_height);
        self
    }

    /// Set the scale options.
    pub fn with_scale(mut self, scale: ScaleOptions) -> Self {
        self.scale = scale;
        self
    }

    /// Enable or disable asset scaling.
    pub fn with_asset_scaling(mut self, enabled: bool) -> Self {
        self.scale_assets = enabled;
        self
    }

    /// Enable or disable static resource installation.
    pub fn with_resources(mut self, install: bool) -> Self {
        self.install_resources = install;
        self
    }

    /// Set the diagram directory on disk.
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(dir.into());
        self
    }

    /// Directory containing the cross-reference pages.
    pub fn sections_dir(&self) -> PathBuf {
        self.target_dir.join("sections")
    }

    /// Directory containing the diagram pairs.
    pub fn asset_dir(&self) -> PathBuf {
        match &self.asset_dir {
            Some(dir) => dir.clone(),
            None => self.target_dir.join(&self.layout.image_subdir),
        }
    }

    /// Directory receiving the stylesheet and scripts.
    pub fn resources_dir(&self) -> PathBuf {
        self.target_dir.join(&self.layout.resources_subdir)
    }

    /// Root of the documentation tree.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Check option values before a batch starts.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.scale.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_options_builder() {
        let options = ProcessOptions::new("doc")
            .use_names(true)
            .with_max_height(250)
            .with_asset_scaling(false)
            .with_resources(false);

        assert_eq!(options.identifier_mode, IdentifierMode::Name);
        assert_eq!(options.scale.max_height, 250.0);
        assert!(!options.scale_assets);
        assert!(!options.install_resources);
    }

    #[test]
    fn test_default_options() {
        let options = ProcessOptions::new("doc");
        assert_eq!(options.identifier_mode, IdentifierMode::Ordinal);
        assert_eq!(options.scale, ScaleOptions::default());
        assert_eq!(options.asset_dir(), PathBuf::from("doc").join("swrlrules"));
        assert_eq!(options.sections_dir(), PathBuf::from("doc").join("sections"));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_explicit_asset_dir() {
        let options = ProcessOptions::new("doc").with_asset_dir("/tmp/rules");
        assert_eq!(options.asset_dir(), PathBuf::from("/tmp/rules"));
    }

    #[test]
    fn test_layout_selectors() {
        let layout = PageLayout::default();
        assert_eq!(layout.entity_selector(), "#swrlrules .entity");
        assert_eq!(layout.entity_child_selector("p"), "#swrlrules .entity p");
        assert_eq!(layout.resource_href("swrl-image.css"), "resources/swrl-image.css");
    }

    #[test]
    fn test_extension_leading_dot_dropped() {
        let layout = PageLayout::new().with_image_extension(".png");
        assert_eq!(layout.image_extension, "png");
    }

    #[test]
    fn test_validate_rejects_zero_height() {
        let options = ProcessOptions::new("doc").with_max_height(0);
        assert!(matches!(options.validate(), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn test_validate_rejects_empty_extension() {
        let options =
            ProcessOptions::new("doc").with_layout(PageLayout::new().with_image_extension(""));
        assert!(matches!(options.validate(), Err(Error::InvalidOption(_))));
    }
}

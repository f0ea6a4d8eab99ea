//! Static stylesheet and script installed next to the documentation.

use crate::error::{Error, Result};
use crate::options::{ProcessOptions, SCALE_SCRIPT_NAME};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Stylesheet for the diagram containers.
pub const STYLESHEET: &str = include_str!("../assets/swrl-image.css");

/// Client script balancing each body/head pair on load.
pub const SCALE_SCRIPT: &str = include_str!("../assets/swrl-image-scale.js");

fn re_max_height() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"(?m)^(\s*)var maxHeight = [^;\n]*;").unwrap())
}

/// The scale script with its height bound set to `max_height`.
pub fn scale_script(max_height: u32) -> String {
    re_max_height()
        .replace(SCALE_SCRIPT, |caps: &regex::Captures<'_>| {
            format!("{}var maxHeight = {};", &caps[1], max_height)
        })
        .into_owned()
}

/// Write the stylesheet and scripts named by the layout into the resources
/// directory.
///
/// The stylesheet is written under `layout.stylesheet`. Among the scripts,
/// only [`SCALE_SCRIPT_NAME`] has embedded content; any other script must
/// already exist in the resources directory, otherwise the index pages
/// would reference a missing file. Returns the paths written.
pub fn install_resources(options: &ProcessOptions) -> Result<Vec<PathBuf>> {
    let layout = &options.layout;
    let dir = options.resources_dir();

    for script in &layout.scripts {
        if script != SCALE_SCRIPT_NAME && !dir.join(script).is_file() {
            return Err(Error::InvalidOption(format!(
                "script {script:?} has no embedded content and is missing from {}",
                dir.display()
            )));
        }
    }

    fs::create_dir_all(&dir)?;

    // The bound is a whole number of pixels in the script
    let max_height = options.scale.max_height.round() as u32;
    let mut files = vec![(layout.stylesheet.as_str(), STYLESHEET.to_string())];
    if layout.scripts.iter().any(|s| s == SCALE_SCRIPT_NAME) {
        files.push((SCALE_SCRIPT_NAME, scale_script(max_height)));
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        fs::write(&path, content)?;
        log::info!("Installed {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{PageLayout, STYLESHEET_NAME};

    #[test]
    fn test_scale_script_height_substituted() {
        let script = scale_script(250);
        assert!(script.contains("var maxHeight = 250;"));
        assert_eq!(script.matches("var maxHeight =").count(), 1);
    }

    #[test]
    fn test_install_resources() {
        let dir = tempfile::tempdir().unwrap();
        let options = ProcessOptions::new(dir.path()).with_max_height(180);

        let written = install_resources(&options).unwrap();
        assert_eq!(written.len(), 2);

        let resources = dir.path().join("resources");
        let css = fs::read_to_string(resources.join("swrl-image.css")).unwrap();
        assert!(css.contains(".grid-container"));
        let js = fs::read_to_string(resources.join("swrl-image-scale.js")).unwrap();
        assert!(js.contains("var maxHeight = 180;"));
    }

    #[test]
    fn test_install_follows_layout_names() {
        let dir = tempfile::tempdir().unwrap();
        let layout = PageLayout::new().with_stylesheet("custom.css");
        let options = ProcessOptions::new(dir.path()).with_layout(layout);

        install_resources(&options).unwrap();
        let resources = dir.path().join("resources");
        assert!(resources.join("custom.css").is_file());
        assert!(!resources.join(STYLESHEET_NAME).exists());
    }

    #[test]
    fn test_install_rejects_unknown_script() {
        let dir = tempfile::tempdir().unwrap();
        let layout = PageLayout::new().with_scripts(["swrl-image-scale.js", "viewer.js"]);
        let options = ProcessOptions::new(dir.path()).with_layout(layout);

        let result = install_resources(&options);
        assert!(matches!(result, Err(Error::InvalidOption(_))));
        assert!(!dir.path().join("resources").exists());
    }

    #[test]
    fn test_install_accepts_existing_script() {
        let dir = tempfile::tempdir().unwrap();
        let resources = dir.path().join("resources");
        fs::create_dir(&resources).unwrap();
        fs::write(resources.join("viewer.js"), "// viewer").unwrap();

        let layout = PageLayout::new().with_scripts(["viewer.js"]);
        let options = ProcessOptions::new(dir.path()).with_layout(layout);

        let written = install_resources(&options).unwrap();
        assert_eq!(written, [resources.join(STYLESHEET_NAME)]);
        assert_eq!(fs::read_to_string(resources.join("viewer.js")).unwrap(), "// viewer");
    }
}

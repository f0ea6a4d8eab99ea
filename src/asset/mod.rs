//! Rule diagram assets on disk.
//!
//! Every rule has a `body` and a `head` diagram named
//! `rule_{identifier}-{part}.{ext}`. The same naming is used for the image
//! references written into pages and for locating the files to scale.

mod scale;
mod size;

pub use scale::{plan_scale, scale_factor, scale_pair, PairScale};
pub use size::{
    parse_length, read_size, resize_svg, size_of_svg, write_size, AssetSize, SIZE_UNIT,
};

use crate::correlate::RuleId;
use std::path::{Path, PathBuf};

/// Which half of a rule a diagram shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetPart {
    /// Rule antecedent
    Body,
    /// Rule consequent
    Head,
}

impl AssetPart {
    /// Both parts, in container order.
    pub const ALL: [AssetPart; 2] = [AssetPart::Body, AssetPart::Head];

    /// Lowercase name used in file names and element ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetPart::Body => "body",
            AssetPart::Head => "head",
        }
    }

    /// Capitalized label shown next to the image.
    pub fn label(&self) -> &'static str {
        match self {
            AssetPart::Body => "Body",
            AssetPart::Head => "Head",
        }
    }

    /// File name of this part of `rule`.
    pub fn file_name(&self, rule: &RuleId, extension: &str) -> String {
        format!("rule_{}-{}.{}", rule, self.as_str(), extension)
    }
}

/// Paths of the two diagrams of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPair {
    /// Body diagram
    pub body: PathBuf,
    /// Head diagram
    pub head: PathBuf,
}

impl AssetPair {
    /// Locate the pair of `rule` inside `dir`.
    pub fn locate(dir: &Path, rule: &RuleId, extension: &str) -> Self {
        Self {
            body: dir.join(AssetPart::Body.file_name(rule, extension)),
            head: dir.join(AssetPart::Head.file_name(rule, extension)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_file_names() {
        let rule = RuleId::new("Has_Part");
        assert_eq!(AssetPart::Body.file_name(&rule, "svg"), "rule_Has_Part-body.svg");
        assert_eq!(AssetPart::Head.file_name(&rule, "png"), "rule_Has_Part-head.png");
    }

    #[test]
    fn test_part_labels() {
        assert_eq!(AssetPart::ALL.map(|p| p.label()), ["Body", "Head"]);
    }

    #[test]
    fn test_locate_pair() {
        let pair = AssetPair::locate(Path::new("doc/swrlrules"), &RuleId::new("3"), "svg");
        assert_eq!(pair.body, Path::new("doc/swrlrules/rule_3-body.svg"));
        assert_eq!(pair.head, Path::new("doc/swrlrules/rule_3-head.svg"));
    }
}

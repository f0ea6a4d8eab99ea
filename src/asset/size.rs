//! Intrinsic size of vector diagram assets.

use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Unit suffix written back to rewritten assets.
pub const SIZE_UNIT: &str = "px";

/// Width and height of an asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetSize {
    /// Intrinsic width
    pub width: f64,
    /// Intrinsic height
    pub height: f64,
}

impl AssetSize {
    /// Create a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Scale the height by `factor` and derive the width from the ratio.
    pub fn scaled(&self, factor: f64) -> Self {
        let height = self.height * factor;
        Self {
            width: height * self.ratio(),
            height,
        }
    }
}

fn re_length() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*([A-Za-z%]*)\s*$").unwrap()
    })
}

fn re_width() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r#"(\swidth\s*=\s*)("[^"]*"|'[^']*')"#).unwrap())
}

fn re_height() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r#"(\sheight\s*=\s*)("[^"]*"|'[^']*')"#).unwrap())
}

/// Parse a length such as `62pt` or `120.5` into its numeric value.
pub fn parse_length(value: &str) -> std::result::Result<f64, String> {
    let caps = re_length()
        .captures(value)
        .ok_or_else(|| format!("not a numeric length: {value:?}"))?;
    if &caps[2] == "%" {
        return Err(format!("relative length not supported: {value:?}"));
    }
    let number: f64 = caps[1]
        .parse()
        .map_err(|_| format!("not a numeric length: {value:?}"))?;
    if !(number.is_finite() && number > 0.0) {
        return Err(format!("length must be positive: {value:?}"));
    }
    Ok(number)
}

/// Parse SVG text. Graphviz output carries a DOCTYPE, so DTDs are allowed.
fn parse_svg(svg: &str) -> std::result::Result<roxmltree::Document<'_>, String> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(svg, options).map_err(|e| e.to_string())
}

/// Read the root element's width/height from SVG text.
pub fn size_of_svg(svg: &str) -> std::result::Result<AssetSize, String> {
    let doc = parse_svg(svg)?;
    let root = doc.root_element();
    let attr = |name: &str| {
        root.attribute(name)
            .ok_or_else(|| format!("missing {name} attribute"))
            .and_then(parse_length)
    };
    Ok(AssetSize::new(attr("width")?, attr("height")?))
}

/// Rewrite the root element's width/height, leaving every other byte alone.
pub fn resize_svg(svg: &str, size: AssetSize) -> std::result::Result<String, String> {
    let doc = parse_svg(svg)?;
    let start = doc.root_element().range().start;
    let end = start_tag_end(svg, start).ok_or("unterminated root start tag")?;

    let mut tag = svg[start..end].to_string();
    tag = set_tag_attribute(&tag, re_width(), "width", &format_length(size.width));
    tag = set_tag_attribute(&tag, re_height(), "height", &format_length(size.height));

    let mut out = String::with_capacity(svg.len() + 16);
    out.push_str(&svg[..start]);
    out.push_str(&tag);
    out.push_str(&svg[end..]);
    Ok(out)
}

/// Read the intrinsic size of the asset at `path`.
pub fn read_size<P: AsRef<Path>>(path: P) -> Result<AssetSize> {
    let path = path.as_ref();
    let svg = fs::read_to_string(path)?;
    size_of_svg(&svg).map_err(|reason| Error::asset_parse(path, reason))
}

/// Rewrite the intrinsic size of the asset at `path`.
///
/// The new content is written next to the asset and renamed over it.
pub fn write_size<P: AsRef<Path>>(path: P, size: AssetSize) -> Result<()> {
    let path = path.as_ref();
    let svg = fs::read_to_string(path)?;
    let resized = resize_svg(&svg, size).map_err(|reason| Error::asset_parse(path, reason))?;
    replace_file(path, &resized)
}

/// Replace the content of `path` through a sibling `.tmp` file.
///
/// The temporary file is removed when the write or the rename fails.
pub(crate) fn replace_file(path: &Path, content: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, path));
    if let Err(err) = result {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}

fn format_length(value: f64) -> String {
    format!("{value}{SIZE_UNIT}")
}

/// Byte offset just past the `>` closing the start tag at `start`.
fn start_tag_end(text: &str, start: usize) -> Option<usize> {
    let mut quote = None;
    for (i, c) in text[start..].char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '>') => return Some(start + i + 1),
            _ => {}
        }
    }
    None
}

fn set_tag_attribute(tag: &str, re: &Regex, name: &str, value: &str) -> String {
    if re.is_match(tag) {
        return re
            .replace(tag, |caps: &regex::Captures<'_>| {
                format!("{}\"{}\"", &caps[1], value)
            })
            .into_owned();
    }
    // Insert right after the tag name
    let name_end = tag[1..]
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .map_or(tag.len(), |i| i + 1);
    format!(
        "{} {}=\"{}\"{}",
        &tag[..name_end],
        name,
        value,
        &tag[name_end..]
    )
}

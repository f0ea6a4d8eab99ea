//! Single-pass scanning of page markup.

use super::DocumentState;
use crate::error::{Error, Result};
use crate::options::PageLayout;
use lol_html::{element, rewrite_str, text, RewriteStrSettings};
use std::cell::RefCell;

/// Attribute marking the script added by the load-event pass.
pub const LOAD_EVENT_SHIM_ATTR: &str = "data-swrl-shim";

/// What a scan saw inside one entity block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityScan {
    /// Decoded text of the first heading, if any
    pub heading: Option<String>,

    /// Number of descriptive paragraphs
    pub paragraphs: usize,

    /// Number of images
    pub images: usize,
}

/// A script element of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptScan {
    /// `src` attribute
    pub src: Option<String>,

    /// Whether this is the synthetic load-event script
    pub is_load_shim: bool,

    /// Inline body
    pub body: String,
}

/// Facts about a page gathered in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScan {
    /// Entity blocks of the rules section
    pub entities: Vec<EntityScan>,

    /// Whether an `html` element exists
    pub has_html: bool,

    /// Whether a `head` element exists
    pub has_head: bool,

    /// `href` of every `link` element
    pub links: Vec<String>,

    /// Every script element
    pub scripts: Vec<ScriptScan>,
}

#[derive(Default)]
struct ScanState {
    scan: PageScan,
    in_first_heading: bool,
}

impl PageScan {
    /// Scan `html` using the selectors of `layout`.
    pub fn of(html: &str, layout: &PageLayout) -> Result<Self> {
        let entity = checked_selector(layout.entity_selector())?;
        let heading = checked_selector(layout.entity_child_selector(&layout.heading_tag))?;
        let paragraph = checked_selector(layout.entity_child_selector("p"))?;
        let image = checked_selector(layout.entity_child_selector("img"))?;

        let state = RefCell::new(ScanState::default());

        rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![
                    element!(entity.as_str(), |_el| {
                        state.borrow_mut().scan.entities.push(EntityScan::default());
                        Ok(())
                    }),
                    element!(heading.as_str(), |_el| {
                        let mut guard = state.borrow_mut();
                        let st = &mut *guard;
                        st.in_first_heading = match st.scan.entities.last_mut() {
                            Some(entity) if entity.heading.is_none() => {
                                entity.heading = Some(String::new());
                                true
                            }
                            _ => false,
                        };
                        Ok(())
                    }),
                    text!(heading.as_str(), |chunk| {
                        let mut guard = state.borrow_mut();
                        let st = &mut *guard;
                        if st.in_first_heading {
                            if let Some(text) = st
                                .scan
                                .entities
                                .last_mut()
                                .and_then(|entity| entity.heading.as_mut())
                            {
                                text.push_str(chunk.as_str());
                            }
                        }
                        Ok(())
                    }),
                    element!(paragraph.as_str(), |_el| {
                        if let Some(entity) = state.borrow_mut().scan.entities.last_mut() {
                            entity.paragraphs += 1;
                        }
                        Ok(())
                    }),
                    element!(image.as_str(), |_el| {
                        if let Some(entity) = state.borrow_mut().scan.entities.last_mut() {
                            entity.images += 1;
                        }
                        Ok(())
                    }),
                    element!("html", |_el| {
                        state.borrow_mut().scan.has_html = true;
                        Ok(())
                    }),
                    element!("head", |_el| {
                        state.borrow_mut().scan.has_head = true;
                        Ok(())
                    }),
                    element!("link", |el| {
                        if let Some(href) = el.get_attribute("href") {
                            state.borrow_mut().scan.links.push(href);
                        }
                        Ok(())
                    }),
                    element!("script", |el| {
                        state.borrow_mut().scan.scripts.push(ScriptScan {
                            src: el.get_attribute("src"),
                            is_load_shim: el.has_attribute(LOAD_EVENT_SHIM_ATTR),
                            body: String::new(),
                        });
                        Ok(())
                    }),
                    text!("script", |chunk| {
                        if let Some(script) = state.borrow_mut().scan.scripts.last_mut() {
                            script.body.push_str(chunk.as_str());
                        }
                        Ok(())
                    }),
                ],
                ..RewriteStrSettings::new()
            },
        )?;

        let mut scan = state.into_inner().scan;
        for entity in &mut scan.entities {
            if let Some(heading) = entity.heading.as_mut() {
                *heading = htmlize::unescape(heading.as_str()).into_owned();
            }
        }
        log::debug!(
            "Scanned page: {} entities, {} scripts, {} links",
            scan.entities.len(),
            scan.scripts.len(),
            scan.links.len()
        );
        Ok(scan)
    }

    /// Total number of descriptive paragraphs across all entities.
    pub fn paragraph_count(&self) -> usize {
        self.entities.iter().map(|entity| entity.paragraphs).sum()
    }

    /// Position (among all scripts) of the first script whose body contains `call`.
    pub fn script_containing(&self, call: &str) -> Option<usize> {
        self.scripts
            .iter()
            .position(|script| script.body.contains(call))
    }
}

impl DocumentState for PageScan {
    fn has_injected_images(&self) -> bool {
        self.entities.iter().any(|entity| entity.images > 0)
    }

    fn has_stylesheet_link(&self, file_name: &str) -> bool {
        self.links.iter().any(|href| href.ends_with(file_name))
    }

    fn has_script_reference(&self, file_name: &str) -> bool {
        self.scripts
            .iter()
            .filter_map(|script| script.src.as_deref())
            .any(|src| src.ends_with(file_name))
    }

    fn has_load_event(&self) -> bool {
        self.scripts.iter().any(|script| script.is_load_shim)
    }
}

/// Reject selectors lol_html cannot compile before they reach its macros.
pub(crate) fn checked_selector(selector: String) -> Result<String> {
    if let Err(err) = selector.parse::<lol_html::Selector>() {
        return Err(Error::Selector {
            selector,
            reason: err.to_string(),
        });
    }
    Ok(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSSREF: &str = r##"<div id="swrlrules"><h2>SWRL rules</h2>
<div class="entity" id="r1"><h3>Has Part <span class="backlink"> back to <a href="#toc">ToC</a></span></h3>
<p>hasPart(?x, ?y) -&gt; partOf(?y, ?x)</p></div>
<div class="entity" id="r2"><p>first</p><p>second</p></div>
<div class="entity" id="r3"><h3>A &amp; B</h3><h3>ignored</h3><p>third</p></div>
</div>
<div class="entity"><h3>Outside</h3><p>not a rule</p></div>"##;

    #[test]
    fn test_scan_entities_in_order() {
        let scan = PageScan::of(CROSSREF, &PageLayout::default()).unwrap();

        assert_eq!(scan.entities.len(), 3);
        assert_eq!(
            scan.entities[0].heading.as_deref(),
            Some("Has Part  back to ToC")
        );
        assert_eq!(scan.entities[0].paragraphs, 1);
        assert_eq!(scan.entities[1].heading, None);
        assert_eq!(scan.entities[1].paragraphs, 2);
        assert_eq!(scan.entities[2].heading.as_deref(), Some("A & B"));
        assert_eq!(scan.paragraph_count(), 4);
        assert!(!scan.has_injected_images());
    }

    #[test]
    fn test_scan_detects_images() {
        let html = r#"<div id="swrlrules"><div class="entity"><p>x</p>
<div class="grid-container"><img src="swrlrules/rule_1-body.svg"></div></div></div>"#;
        let scan = PageScan::of(html, &PageLayout::default()).unwrap();
        assert!(scan.has_injected_images());
    }

    #[test]
    fn test_images_outside_rules_ignored() {
        let html = r#"<img src="logo.png"><div id="swrlrules"><div class="entity"><p>x</p></div></div>"#;
        let scan = PageScan::of(html, &PageLayout::default()).unwrap();
        assert!(!scan.has_injected_images());
    }

    #[test]
    fn test_scan_head_links_and_scripts() {
        let html = r#"<html><head><link rel="stylesheet" href="resources/swrl-image.css">
<script src="resources/jquery.js"></script>
<script>$(function(){ loadTOC(); });</script></head><body></body></html>"#;
        let scan = PageScan::of(html, &PageLayout::default()).unwrap();

        assert!(scan.has_html);
        assert!(scan.has_head);
        assert!(scan.has_stylesheet_link("swrl-image.css"));
        assert!(!scan.has_stylesheet_link("other.css"));
        assert!(scan.has_script_reference("jquery.js"));
        assert!(!scan.has_load_event());
        assert_eq!(scan.script_containing("loadTOC();"), Some(1));
        assert_eq!(scan.script_containing("missing();"), None);
    }

    #[test]
    fn test_scan_without_head() {
        let scan = PageScan::of("<html><body></body></html>", &PageLayout::default()).unwrap();
        assert!(scan.has_html);
        assert!(!scan.has_head);
    }

    #[test]
    fn test_document_state_from_fields() {
        // The queries only depend on scanned facts
        let scan = PageScan {
            entities: vec![EntityScan {
                heading: None,
                paragraphs: 1,
                images: 2,
            }],
            scripts: vec![ScriptScan {
                src: None,
                is_load_shim: true,
                body: String::new(),
            }],
            ..PageScan::default()
        };
        assert!(scan.has_injected_images());
        assert!(scan.has_load_event());
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let layout = PageLayout::new().with_heading_tag("h3[");
        let result = PageScan::of("<p></p>", &layout);
        assert!(matches!(result, Err(Error::Selector { .. })));
    }
}

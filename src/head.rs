//! Head augmentation of index pages.
//!
//! Index pages get the diagram stylesheet, the client scaling script, and a
//! synthetic `DOMContentLoaded` dispatch. Widoco loads the cross-reference
//! section asynchronously after the real event fired, so scripts listening
//! for it are re-triggered once the viewer's initialisation call has run.
//!
//! Every operation is idempotent: re-running it on its own output leaves the
//! page unchanged.

use crate::error::Result;
use crate::options::PageLayout;
use crate::page::{DocumentState, Page, PageScan, LOAD_EVENT_SHIM_ATTR};
use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings};

/// Body of the synthetic load-event script.
pub const LOAD_EVENT_DISPATCH: &str =
    r#"window.addEventListener("load", function () { document.dispatchEvent(new Event("DOMContentLoaded")); });"#;

/// Outcome of [`add_stylesheet_link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The link was appended to the head.
    Added,
    /// A link to the stylesheet was already present.
    AlreadyExists,
}

/// Outcome of [`add_load_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent {
    /// The dispatch script was inserted after the initialisation script.
    Added,
    /// The dispatch script was already present.
    AlreadyPresent,
    /// No script contains the initialisation call.
    InitCallNotFound,
}

/// What [`augment_index`] did to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexAugmentation {
    /// The stylesheet link existed; the page was skipped.
    Skipped,
    /// The page was augmented.
    Updated {
        /// Script references added
        scripts_added: usize,
        /// Load-event outcome
        load_event: LoadEvent,
    },
}

/// Add a stylesheet link for `file_name` to the head.
pub fn add_stylesheet_link(
    page: &mut Page,
    layout: &PageLayout,
    file_name: &str,
) -> Result<LinkOutcome> {
    let scan = page.scan(layout)?;
    if scan.has_stylesheet_link(file_name) {
        log::warn!(
            "CSS link to {} already exists in {}. Skipping",
            file_name,
            page.path().display()
        );
        return Ok(LinkOutcome::AlreadyExists);
    }

    let link = format!(
        r#"<link rel="stylesheet" type="text/css" href="{}">"#,
        htmlize::escape_attribute(layout.resource_href(file_name))
    );
    append_to_head(page, &scan, &link)?;
    log::info!("CSS link added to {}", page.path().display());
    Ok(LinkOutcome::Added)
}

/// Append deferred script references to the head.
///
/// Scripts already referenced by the page are not added again. Returns the
/// number of references added.
pub fn add_script_references<S: AsRef<str>>(
    page: &mut Page,
    layout: &PageLayout,
    scripts: &[S],
) -> Result<usize> {
    let scan = page.scan(layout)?;
    let mut markup = String::new();
    let mut added = 0;
    for script in scripts {
        let script = script.as_ref();
        if scan.has_script_reference(script) {
            log::debug!("Script {} already referenced", script);
            continue;
        }
        markup.push_str(&format!(
            r#"<script src="{}" defer></script>"#,
            htmlize::escape_attribute(layout.resource_href(script))
        ));
        log::info!("Adding script {} to {}", script, page.path().display());
        added += 1;
    }

    if added > 0 {
        append_to_head(page, &scan, &markup)?;
    }
    Ok(added)
}

/// Insert the synthetic load-event script after the initialisation script.
pub fn add_load_event(page: &mut Page, layout: &PageLayout) -> Result<LoadEvent> {
    let scan = page.scan(layout)?;
    if scan.has_load_event() {
        log::debug!("Load event already present in {}", page.path().display());
        return Ok(LoadEvent::AlreadyPresent);
    }
    let Some(target) = scan.script_containing(&layout.init_call) else {
        log::warn!(
            "No script calls {} in {}; load event not added",
            layout.init_call,
            page.path().display()
        );
        return Ok(LoadEvent::InitCallNotFound);
    };

    let shim = format!(r#"<script {LOAD_EVENT_SHIM_ATTR}="load-event">{LOAD_EVENT_DISPATCH}</script>"#);
    let mut index = 0usize;
    let html = rewrite_str(
        page.html(),
        RewriteStrSettings {
            element_content_handlers: vec![element!("script", |el| {
                if index == target {
                    el.after(&shim, ContentType::Html);
                }
                index += 1;
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;
    page.set_html(html);
    log::info!("Load event added to {}", page.path().display());
    Ok(LoadEvent::Added)
}

/// Apply the stylesheet, script, and load-event passes to an index page.
///
/// A page that already links the stylesheet is skipped entirely.
pub fn augment_index(page: &mut Page, layout: &PageLayout) -> Result<IndexAugmentation> {
    if add_stylesheet_link(page, layout, &layout.stylesheet)? == LinkOutcome::AlreadyExists {
        return Ok(IndexAugmentation::Skipped);
    }
    let scripts_added = add_script_references(page, layout, layout.scripts.as_slice())?;
    let load_event = add_load_event(page, layout)?;
    Ok(IndexAugmentation::Updated {
        scripts_added,
        load_event,
    })
}

fn append_to_head(page: &mut Page, scan: &PageScan, markup: &str) -> Result<()> {
    if !scan.has_head {
        log::info!("Creating head element in {}", page.path().display());
        let head = format!("<head>{markup}</head>");
        if !scan.has_html {
            let html = format!("{head}{}", page.html());
            page.set_html(html);
            return Ok(());
        }
        let html = insert_once(page.html(), "html", |el| {
            el.prepend(&head, ContentType::Html);
        })?;
        page.set_html(html);
        return Ok(());
    }

    let html = insert_once(page.html(), "head", |el| {
        el.append(markup, ContentType::Html);
    })?;
    page.set_html(html);
    Ok(())
}

/// Run `edit` on the first element matching `selector`.
fn insert_once<F>(html: &str, selector: &str, mut edit: F) -> Result<String>
where
    F: FnMut(&mut lol_html::html_content::Element<'_, '_>),
{
    let mut done = false;
    let out = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(selector, |el| {
                if !done {
                    edit(el);
                    done = true;
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;
    Ok(out)
}

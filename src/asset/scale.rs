//! Proportional scaling of body/head diagram pairs.

use super::size::{replace_file, resize_svg, size_of_svg, AssetSize};
use super::AssetPair;
use crate::error::{Error, Result};
use crate::options::ScaleOptions;
use std::fs;
use std::path::Path;

/// Sizes before and after scaling one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScale {
    /// Shared factor applied to both assets
    pub factor: f64,
    /// Whether the compensated fallback produced `factor`
    pub compensated: bool,
    /// Body size before scaling
    pub body_before: AssetSize,
    /// Head size before scaling
    pub head_before: AssetSize,
    /// Body size after scaling
    pub body_after: AssetSize,
    /// Head size after scaling
    pub head_after: AssetSize,
}

/// Compute the shared factor for a pair.
///
/// The primary factor only looks at the body height. When it falls below
/// `min_scale`, the factor is recomputed against the taller of the two with
/// `height_compensation` added to the bound. Returns the factor and whether
/// the fallback was taken.
pub fn scale_factor(body: AssetSize, head: AssetSize, options: &ScaleOptions) -> (f64, bool) {
    let factor = options.max_height / body.height;
    if factor < options.min_scale {
        let fallback =
            (options.max_height + options.height_compensation) / body.height.max(head.height);
        (fallback, true)
    } else {
        (factor, false)
    }
}

/// Compute the scaled sizes of a pair without touching disk.
pub fn plan_scale(body: AssetSize, head: AssetSize, options: &ScaleOptions) -> PairScale {
    let (factor, compensated) = scale_factor(body, head, options);
    PairScale {
        factor,
        compensated,
        body_before: body,
        head_before: head,
        body_after: body.scaled(factor),
        head_after: head.scaled(factor),
    }
}

/// Scale both assets of `pair` and persist the new sizes.
///
/// Both files must exist, parse, and resize before either is rewritten.
pub fn scale_pair(pair: &AssetPair, options: &ScaleOptions) -> Result<PairScale> {
    for path in [&pair.body, &pair.head] {
        if !path.is_file() {
            return Err(Error::AssetNotFound(path.clone()));
        }
    }

    let body_svg = fs::read_to_string(&pair.body)?;
    let head_svg = fs::read_to_string(&pair.head)?;

    let body = size_of_svg(&body_svg).map_err(parse_error(&pair.body))?;
    let head = size_of_svg(&head_svg).map_err(parse_error(&pair.head))?;
    let plan = plan_scale(body, head, options);

    let body_out = resize_svg(&body_svg, plan.body_after).map_err(parse_error(&pair.body))?;
    let head_out = resize_svg(&head_svg, plan.head_after).map_err(parse_error(&pair.head))?;

    log::debug!(
        "Scale factor {:.4}{} for {}",
        plan.factor,
        if plan.compensated { " (compensated)" } else { "" },
        pair.body.display()
    );

    replace_file(&pair.body, &body_out)?;
    replace_file(&pair.head, &head_out)?;

    log::info!(
        "Scaled {} to {:.1}x{:.1} and {} to {:.1}x{:.1}",
        pair.body.display(),
        plan.body_after.width,
        plan.body_after.height,
        pair.head.display(),
        plan.head_after.width,
        plan.head_after.height
    );
    Ok(plan)
}

fn parse_error(path: &Path) -> impl FnOnce(String) -> Error + '_ {
    move |reason| Error::asset_parse(path, reason)
}

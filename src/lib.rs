#![doc(html_logo_url = "https://nical.github.io/lyon-doc/lyon-logo.svg")]

//! Top-level orchestration: decode an SVG document, walk it into leaf
//! shapes with their transform chains, evaluate each leaf into a motion
//! [`Segment`], order the segments, and assemble them into a finished
//! G-code [`Program`].
//!
//! ```ignore
//! let profile = svgplot_config::lk5_pro();
//! let program = svgplot::convert(&svg_text, &profile, svgplot_ordering::Strategy::TwoOpt)?;
//! ```

mod assembly;

use svgplot_config::RuntimeConfig;
use svgplot_doc::{Element, WalkError, XmlError};
use svgplot_geom::{Transform, TransformChain, Unit};
use svgplot_motion::{evaluate_circle, evaluate_commands, evaluate_ellipse, EvalError, Segment};
use svgplot_ordering::Strategy;
use svgplot_path::{line_path, parse_path, polygon_path, polyline_path, rect_path, ParseError};

pub use svgplot_config::PlotterConfig;
pub use svgplot_motion::Program;
pub use svgplot_ordering::Strategy as OrderingStrategy;

pub use crate::assembly::assemble;

/// The input document's own coordinates are assumed to be plain SVG user
/// units (1 user unit = 1px, per the CSS reference pixel SVG falls back to
/// when no unit suffix is present on the root `width`/`height`). The input
/// format (SPEC_FULL.md §6) never exposes a unit override, so this is fixed
/// rather than configurable.
pub const DOCUMENT_UNIT: Unit = Unit::Px;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error(transparent)]
    Lowering(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("element variant '{0}' reached the leaf dispatcher with no lowering or evaluation arm")]
    UnhandledLeaf(&'static str),
}

/// Builds the plotter-level transform chain: pen offset applied first
/// internally, mirror applied last internally, so that — composed with a
/// leaf's own document chain via `then` — the overall application order is
/// document transforms first, then mirror, then pen-offset (§9's
/// mirror-before-pen-offset decision).
fn plotter_chain(profile: &PlotterConfig) -> TransformChain {
    let mut chain = TransformChain::new();
    chain.push(Transform::Translate { offset: profile.pen_offset });
    chain.push(Transform::Mirror {
        mx: profile.mirror_x_axis,
        my: profile.mirror_y_axis,
        centre: profile.plate_center,
    });
    chain
}

/// Converts an SVG document into an assembled G-code program under the
/// given plotter profile and segment-ordering strategy.
pub fn convert(svg_text: &str, profile: &PlotterConfig, ordering: Strategy) -> Result<Program, ConvertError> {
    let doc = svgplot_doc::decode(svg_text)?;
    let leaves = svgplot_doc::walk(&doc)?;
    if leaves.is_empty() {
        log::warn!("document produced no segments");
    }

    let runtime = RuntimeConfig::from_plotter(profile, DOCUMENT_UNIT);
    let device_chain = plotter_chain(profile);

    let mut segments = Vec::new();
    for (leaf_chain, element) in &leaves {
        let chain = device_chain.clone().then(leaf_chain.clone());
        match evaluate_leaf(element, &chain, &runtime)? {
            Some(seg) => segments.push(seg),
            None => log::warn!("skipping degenerate shape with no geometry"),
        }
    }

    log::info!("evaluated {} segment(s); ordering with {:?}", segments.len(), ordering);
    let ordered = svgplot_ordering::order(segments, ordering);
    Ok(assembly::assemble(ordered, profile, &runtime))
}

fn evaluate_leaf(el: &Element, chain: &TransformChain, cfg: &RuntimeConfig) -> Result<Option<Segment>, ConvertError> {
    let d = match el {
        Element::Path { d, .. } => d.clone(),
        Element::Line { x1, y1, x2, y2, .. } => line_path(*x1, *y1, *x2, *y2),
        Element::Rect { x, y, width, height, rx, ry, .. } => rect_path(*x, *y, *width, *height, *rx, *ry),
        Element::Polygon { points, .. } => polygon_path(points),
        Element::Polyline { points, .. } => polyline_path(points),
        Element::Circle { cx, cy, r, .. } => {
            if *r <= 0.0 {
                return Ok(None);
            }
            return Ok(Some(evaluate_circle(*cx, *cy, *r, chain, cfg)?));
        }
        Element::Ellipse { cx, cy, rx, ry, .. } => {
            if *rx <= 0.0 || *ry <= 0.0 {
                return Ok(None);
            }
            return Ok(Some(evaluate_ellipse(*cx, *cy, *rx, *ry, chain, cfg)?));
        }
        other => return Err(ConvertError::UnhandledLeaf(variant_name(other))),
    };

    if d.trim().is_empty() {
        return Ok(None);
    }
    let commands = parse_path(&d)?;
    if commands.is_empty() {
        return Ok(None);
    }
    Ok(Some(evaluate_commands(&commands, chain, cfg)?))
}

fn variant_name(el: &Element) -> &'static str {
    match el {
        Element::Svg { .. } => "Svg",
        Element::Group { .. } => "Group",
        Element::Anchor { .. } => "Anchor",
        Element::Defs { .. } => "Defs",
        Element::Use { .. } => "Use",
        Element::Text { .. } => "Text",
        Element::Path { .. } => "Path",
        Element::Line { .. } => "Line",
        Element::Rect { .. } => "Rect",
        Element::Circle { .. } => "Circle",
        Element::Ellipse { .. } => "Ellipse",
        Element::Polygon { .. } => "Polygon",
        Element::Polyline { .. } => "Polyline",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgplot_geom::{V2, V3};

    fn neutral_profile() -> PlotterConfig {
        PlotterConfig {
            gprefix: String::new(),
            gsuffix: String::new(),
            length_unit: Unit::Px,
            plate_center: V2::ZERO,
            plate_min: V3::splat(0.0),
            plate_max: V3::splat(1000.0),
            drawing_height: 0.0,
            retract_height: 5.0,
            draw_speed: 1500.0,
            retract_speed: 3000.0,
            remove_comments: false,
            mirror_x_axis: false,
            mirror_y_axis: false,
            pen_offset: V2::ZERO,
        }
    }

    #[test]
    fn line_scenario_has_expected_bounds_and_end() {
        let svg = r#"<svg><line x1="0" y1="0" x2="10" y2="0"/></svg>"#;
        let program = convert(svg, &neutral_profile(), Strategy::Identity).unwrap();
        assert_eq!(program.end, V3::new(10.0, 0.0, 0.0));
        assert!(program.bmin.x <= 0.0 && program.bmax.x >= 10.0);
    }

    #[test]
    fn rect_scenario_is_closed_with_equal_endpoints() {
        let svg = r#"<svg><rect x="0" y="0" width="10" height="10"/></svg>"#;
        let program = convert(svg, &neutral_profile(), Strategy::Identity).unwrap();
        assert_eq!(program.start, program.end);
    }

    #[test]
    fn circle_scenario_emits_one_arc() {
        let svg = r#"<svg><circle cx="5" cy="5" r="2"/></svg>"#;
        let program = convert(svg, &neutral_profile(), Strategy::Identity).unwrap();
        let arcs = program.code.iter().filter(|l| l.starts_with("G2")).count();
        assert_eq!(arcs, 1);
    }

    #[test]
    fn quadratic_path_scenario_emits_twenty_draws() {
        let svg = r#"<svg><path d="M0 0 Q5 10 10 0"/></svg>"#;
        let program = convert(svg, &neutral_profile(), Strategy::Identity).unwrap();
        let draws = program.code.iter().filter(|l| l.starts_with("G1 X")).count();
        assert_eq!(draws, 20);
    }

    #[test]
    fn group_transform_folds_into_segment_endpoint() {
        let svg = r#"<svg><g transform="translate(5 5)"><line x1="0" y1="0" x2="1" y2="0"/></g></svg>"#;
        let program = convert(svg, &neutral_profile(), Strategy::Identity).unwrap();
        assert_eq!(program.end, V3::new(6.0, 5.0, 0.0));
    }

    #[test]
    fn empty_document_warns_but_still_assembles_prefix_and_suffix() {
        let svg = r#"<svg></svg>"#;
        let program = convert(svg, &neutral_profile(), Strategy::Identity).unwrap();
        assert!(program.code.iter().any(|l| l.starts_with(';')));
    }

    #[test]
    fn unresolved_use_is_a_fatal_conversion_error() {
        let svg = r#"<svg><use href="#missing"/></svg>"#;
        assert!(matches!(convert(svg, &neutral_profile(), Strategy::Identity), Err(ConvertError::Walk(_))));
    }
}

use svgplot_geom::V2;

use crate::F;

/// An elliptical arc argument record, as parsed from an `A`/`a` command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArcArg {
    pub r: V2,
    pub x_axis_deg: F,
    pub large: bool,
    pub sweep: bool,
    pub to: V2,
}

/// One command in the SVG path-data AST. `relative` is `true` when the
/// command letter was lower-case. `ClosePath` has no relativity and no
/// payload.
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo { relative: bool, points: Vec<V2> },
    LineTo { relative: bool, points: Vec<V2> },
    HLineTo { relative: bool, coords: Vec<F> },
    VLineTo { relative: bool, coords: Vec<F> },
    /// Point triplets: `(control1, control2, end)` repeated.
    CurveTo { relative: bool, points: Vec<V2> },
    /// Point doubles: `(control2, end)` repeated.
    SmoothCurveTo { relative: bool, points: Vec<V2> },
    /// Point doubles: `(control, end)` repeated.
    QuadraticBezierTo { relative: bool, points: Vec<V2> },
    SmoothQuadraticBezierTo { relative: bool, points: Vec<V2> },
    EllipticalArc { relative: bool, arcs: Vec<ArcArg> },
    ClosePath,
}

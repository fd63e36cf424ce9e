use svgplot_config::RuntimeConfig;
use svgplot_geom::{convert, TransformChain, F, V2, V3};
use svgplot_path::{circle_path, ellipse_path, parse_path, ArcArg, PathCommand};

use crate::builder::MotionBuilder;
use crate::segment::Segment;

#[derive(thiserror::Error, Debug)]
pub enum EvalError {
    #[error("path evaluator received an empty command stream")]
    EmptyCommandStream,
    #[error("internal shape lowering produced unparseable path data: {0}")]
    Lowering(#[from] svgplot_path::ParseError),
}

const ARC_SAMPLES: u32 = 20;

fn project(p: V2, chain: &TransformChain, cfg: &RuntimeConfig) -> V2 {
    let transformed = chain.apply(p);
    V2::new(
        convert(transformed.x, cfg.svg_unit, cfg.plotter_unit),
        convert(transformed.y, cfg.svg_unit, cfg.plotter_unit),
    )
}

fn cubic_bezier(p0: V2, c1: V2, c2: V2, p1: V2, t: F) -> V2 {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    V2::new(
        a * p0.x + b * c1.x + c * c2.x + d * p1.x,
        a * p0.y + b * c1.y + c * c2.y + d * p1.y,
    )
}

fn quadratic_bezier(p0: V2, c: V2, p1: V2, t: F) -> V2 {
    let u = 1.0 - t;
    let a = u * u;
    let b = 2.0 * u * t;
    let d = t * t;
    V2::new(a * p0.x + b * c.x + d * p1.x, a * p0.y + b * c.y + d * p1.y)
}

/// Endpoint-to-centre arc parameterisation, SVG 1.1 Appendix F.6.5.
/// Returns `(centre, rx, ry, theta1, delta_theta, x_axis_rotation)` in the
/// original (untransformed) coordinate space.
fn arc_to_center(p0: V2, arc: &ArcArg, p1: V2) -> (V2, F, F, F, F, F) {
    let phi = arc.x_axis_deg.to_radians();
    let (cos_phi, sin_phi) = (phi.cos(), phi.sin());

    let dx2 = (p0.x - p1.x) / 2.0;
    let dy2 = (p0.y - p1.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    let mut rx = arc.r.x.abs();
    let mut ry = arc.r.y.abs();
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let sign = if arc.large == arc.sweep { -1.0 } else { 1.0 };
    let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let mut den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    if den == 0.0 {
        den = 1e-9;
    }
    let co = sign * (num / den).max(0.0).sqrt();
    let cxp = co * (rx * y1p / ry);
    let cyp = co * (-(ry * x1p / rx));

    let cx = cos_phi * cxp - sin_phi * cyp + (p0.x + p1.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (p0.y + p1.y) / 2.0;

    let angle_between = |ux: F, uy: F, vx: F, vy: F| -> F {
        let dot = ux * vx + uy * vy;
        let len = ((ux * ux + uy * uy) * (vx * vx + vy * vy)).sqrt();
        let mut a = (dot / len).clamp(-1.0, 1.0).acos();
        if ux * vy - uy * vx < 0.0 {
            a = -a;
        }
        a
    };

    let theta1 = angle_between(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
    let mut delta = angle_between((x1p - cxp) / rx, (y1p - cyp) / ry, (-x1p - cxp) / rx, (-y1p - cyp) / ry);
    if !arc.sweep && delta > 0.0 {
        delta -= 2.0 * std::f64::consts::PI;
    }
    if arc.sweep && delta < 0.0 {
        delta += 2.0 * std::f64::consts::PI;
    }

    (V2::new(cx, cy), rx, ry, theta1, delta, phi)
}

fn arc_point(centre: V2, rx: F, ry: F, theta: F, phi: F) -> V2 {
    let (cos_phi, sin_phi) = (phi.cos(), phi.sin());
    V2::new(
        centre.x + rx * theta.cos() * cos_phi - ry * theta.sin() * sin_phi,
        centre.y + rx * theta.cos() * sin_phi + ry * theta.sin() * cos_phi,
    )
}

struct State {
    current: V2,
    segment_start: V2,
    path_first: V2,
    first_moveto_seen: bool,
    pen_down: bool,
}

/// Evaluates a path-command stream against a transform chain and runtime
/// configuration, producing one [`Segment`]. The transform chain should
/// already compose the document's ancestor chain with the leaf's own
/// transform and the plotter's mirror/pen-offset chain.
pub fn evaluate_commands(commands: &[PathCommand], chain: &TransformChain, cfg: &RuntimeConfig) -> Result<Segment, EvalError> {
    if commands.is_empty() {
        return Err(EvalError::EmptyCommandStream);
    }

    let mut b = MotionBuilder::new(cfg);
    b.retract();
    let mut st = State {
        current: V2::ZERO,
        segment_start: V2::ZERO,
        path_first: V2::ZERO,
        first_moveto_seen: false,
        pen_down: false,
    };

    for cmd in commands {
        match cmd {
            PathCommand::MoveTo { relative, points } => {
                if st.pen_down {
                    b.retract();
                    st.pen_down = false;
                }
                let raw = points[0];
                let p = if *relative { st.current + raw } else { raw };
                b.move_retracted(project(p, chain, cfg));
                st.current = p;
                st.segment_start = p;
                if !st.first_moveto_seen {
                    st.path_first = p;
                    st.first_moveto_seen = true;
                }
            }
            PathCommand::LineTo { relative, points } => {
                lower_pen(&mut b, &mut st);
                for raw in points {
                    let p = if *relative { st.current + *raw } else { *raw };
                    b.draw(project(p, chain, cfg));
                    st.current = p;
                }
            }
            PathCommand::HLineTo { relative, coords } => {
                lower_pen(&mut b, &mut st);
                for x in coords {
                    let p = if *relative { V2::new(st.current.x + x, st.current.y) } else { V2::new(*x, st.current.y) };
                    b.draw(project(p, chain, cfg));
                    st.current = p;
                }
            }
            PathCommand::VLineTo { relative, coords } => {
                lower_pen(&mut b, &mut st);
                for y in coords {
                    let p = if *relative { V2::new(st.current.x, st.current.y + y) } else { V2::new(st.current.x, *y) };
                    b.draw(project(p, chain, cfg));
                    st.current = p;
                }
            }
            PathCommand::CurveTo { relative, points } => {
                lower_pen(&mut b, &mut st);
                for triplet in points.chunks_exact(3) {
                    let base = st.current;
                    let c1 = if *relative { base + triplet[0] } else { triplet[0] };
                    let c2 = if *relative { base + triplet[1] } else { triplet[1] };
                    let end = if *relative { base + triplet[2] } else { triplet[2] };
                    sample_cubic(&mut b, base, c1, c2, end, chain, cfg);
                    st.current = end;
                }
            }
            PathCommand::SmoothCurveTo { relative, points } => {
                lower_pen(&mut b, &mut st);
                for pair in points.chunks_exact(2) {
                    let base = st.current;
                    let c2 = if *relative { base + pair[0] } else { pair[0] };
                    let end = if *relative { base + pair[1] } else { pair[1] };
                    // No reflection of the previous control point (decided): the
                    // first control point is taken to coincide with the start.
                    sample_cubic(&mut b, base, base, c2, end, chain, cfg);
                    st.current = end;
                }
            }
            PathCommand::QuadraticBezierTo { relative, points } => {
                lower_pen(&mut b, &mut st);
                for pair in points.chunks_exact(2) {
                    let base = st.current;
                    let ctrl = if *relative { base + pair[0] } else { pair[0] };
                    let end = if *relative { base + pair[1] } else { pair[1] };
                    sample_quadratic(&mut b, base, ctrl, end, chain, cfg);
                    st.current = end;
                }
            }
            PathCommand::SmoothQuadraticBezierTo { relative, points } => {
                lower_pen(&mut b, &mut st);
                for raw in points {
                    let base = st.current;
                    let end = if *relative { base + *raw } else { *raw };
                    // No reflection (decided): control coincides with the start.
                    sample_quadratic(&mut b, base, base, end, chain, cfg);
                    st.current = end;
                }
            }
            PathCommand::EllipticalArc { relative, arcs } => {
                lower_pen(&mut b, &mut st);
                for arc in arcs {
                    let base = st.current;
                    let to = if *relative { base + arc.to } else { arc.to };
                    if arc.r.x.abs() < 1e-9 || arc.r.y.abs() < 1e-9 {
                        log::debug!("arc with a zero radius treated as a straight line to {to}");
                        b.draw(project(to, chain, cfg));
                    } else {
                        let (centre, rx, ry, theta1, delta, phi) = arc_to_center(base, arc, to);
                        for i in 1..=ARC_SAMPLES {
                            let theta = theta1 + (i as F / ARC_SAMPLES as F) * delta;
                            let p = arc_point(centre, rx, ry, theta, phi);
                            b.draw(project(p, chain, cfg));
                        }
                    }
                    st.current = to;
                }
            }
            PathCommand::ClosePath => {
                if st.pen_down {
                    b.draw(project(st.segment_start, chain, cfg));
                    b.retract();
                    st.pen_down = false;
                }
                st.current = st.segment_start;
            }
        }
    }

    let mut seg = b.finish();
    seg.start = V3::new(
        project(st.path_first, chain, cfg).x,
        project(st.path_first, chain, cfg).y,
        cfg.draw_height,
    );
    seg.end = V3::new(project(st.current, chain, cfg).x, project(st.current, chain, cfg).y, cfg.draw_height);
    Ok(seg)
}

fn lower_pen(b: &mut MotionBuilder, st: &mut State) {
    if !st.pen_down {
        b.draw_pos();
        st.pen_down = true;
    }
}

fn sample_cubic(b: &mut MotionBuilder, p0: V2, c1: V2, c2: V2, p1: V2, chain: &TransformChain, cfg: &RuntimeConfig) {
    for i in 1..=ARC_SAMPLES {
        let t = i as F / ARC_SAMPLES as F;
        let p = cubic_bezier(p0, c1, c2, p1, t);
        b.draw(project(p, chain, cfg));
    }
}

fn sample_quadratic(b: &mut MotionBuilder, p0: V2, c: V2, p1: V2, chain: &TransformChain, cfg: &RuntimeConfig) {
    for i in 1..=ARC_SAMPLES {
        let t = i as F / ARC_SAMPLES as F;
        let p = quadratic_bezier(p0, c, p1, t);
        b.draw(project(p, chain, cfg));
    }
}

/// Evaluates a `<circle>` leaf. When the transform chain is empty and the
/// SVG and plotter units already match, takes a native-arc fast path
/// (`G2` around the current position) instead of flattening to 20 line
/// segments; otherwise falls back to the generic lowering-then-evaluate
/// path shared with every other shape.
pub fn evaluate_circle(cx: F, cy: F, r: F, chain: &TransformChain, cfg: &RuntimeConfig) -> Result<Segment, EvalError> {
    if chain.0.is_empty() && cfg.svg_unit == cfg.plotter_unit {
        let mut b = MotionBuilder::new(cfg);
        b.retract();
        let top = V2::new(cx, cy - r);
        b.move_retracted(top);
        b.draw_pos();
        b.draw_circle(V2::new(0.0, r), r, true);
        let mut seg = b.finish();
        seg.start = V3::new(top.x, top.y, cfg.draw_height);
        seg.end = seg.start;
        return Ok(seg);
    }
    let d = circle_path(cx, cy, r);
    let commands = parse_path(&d)?;
    evaluate_commands(&commands, chain, cfg)
}

/// Evaluates an `<ellipse>` leaf by lowering to path data (no native-arc
/// fast path — `G2`/`G3` only express circular arcs, not elliptical ones).
pub fn evaluate_ellipse(cx: F, cy: F, rx: F, ry: F, chain: &TransformChain, cfg: &RuntimeConfig) -> Result<Segment, EvalError> {
    let d = ellipse_path(cx, cy, rx, ry);
    let commands = parse_path(&d)?;
    evaluate_commands(&commands, chain, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgplot_config::RuntimeConfig;
    use svgplot_geom::Unit;

    fn cfg() -> RuntimeConfig {
        RuntimeConfig {
            plotter_unit: Unit::Mm,
            svg_unit: Unit::Mm,
            draw_height: 0.0,
            retract_height: 5.0,
            draw_speed: 1500.0,
            retract_speed: 3000.0,
        }
    }

    #[test]
    fn line_bounds_and_endpoints() {
        let commands = parse_path("M0 0 L10 0").unwrap();
        let chain = TransformChain::new();
        let seg = evaluate_commands(&commands, &chain, &cfg()).unwrap();
        assert_eq!(seg.start, V3::new(0.0, 0.0, 0.0));
        assert_eq!(seg.end, V3::new(10.0, 0.0, 0.0));
        assert_eq!(seg.bmin.x, 0.0);
        assert_eq!(seg.bmax.x, 10.0);
        assert_eq!(seg.bmin.y, 0.0);
        assert_eq!(seg.bmax.y, 0.0);
    }

    #[test]
    fn circle_fast_path_emits_one_arc_line() {
        let chain = TransformChain::new();
        let seg = evaluate_circle(50.0, 50.0, 10.0, &chain, &cfg()).unwrap();
        let arc_lines: Vec<_> = seg.code.iter().filter(|l| l.starts_with("G2")).collect();
        assert_eq!(arc_lines.len(), 1);
        assert_eq!(arc_lines[0], "G2 I0 J10 F1500");
        // bmin.x/y pick up the leading pen-up retraction at the segment's
        // starting pen position (0, 0), ahead of the circle itself.
        assert_eq!(seg.bmin.x, 0.0);
        assert_eq!(seg.bmax.x, 60.0);
        assert_eq!(seg.bmin.y, 0.0);
        assert_eq!(seg.bmax.y, 60.0);
    }

    #[test]
    fn leading_retraction_is_unconditional_and_widens_bounds() {
        let commands = parse_path("M0 0 L10 0").unwrap();
        let chain = TransformChain::new();
        let seg = evaluate_commands(&commands, &chain, &cfg()).unwrap();
        assert_eq!(seg.code[0], "G0 Z5 F3000");
        assert_eq!(seg.bmin.z, 0.0);
        assert_eq!(seg.bmax.z, 5.0);
    }

    #[test]
    fn closed_square_ends_with_draw_then_retract() {
        let commands = parse_path("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        let chain = TransformChain::new();
        let seg = evaluate_commands(&commands, &chain, &cfg()).unwrap();
        let last_two: Vec<&str> = seg.code.iter().rev().take(2).map(String::as_str).collect();
        assert!(last_two[1].starts_with("G1 X0 Y0"));
        assert!(last_two[0].starts_with("G0"));
    }

    #[test]
    fn quadratic_curve_emits_twenty_drawing_moves() {
        let commands = parse_path("M0 0 Q5 10 10 0").unwrap();
        let chain = TransformChain::new();
        let seg = evaluate_commands(&commands, &chain, &cfg()).unwrap();
        let draws = seg.code.iter().filter(|l| l.starts_with("G1 X")).count();
        assert_eq!(draws, ARC_SAMPLES as usize);
    }

    #[test]
    fn empty_command_stream_is_a_runtime_error() {
        let chain = TransformChain::new();
        assert!(matches!(evaluate_commands(&[], &chain, &cfg()), Err(EvalError::EmptyCommandStream)));
    }
}

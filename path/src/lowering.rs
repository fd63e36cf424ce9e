use crate::F;

/// Formats a coordinate with enough precision to round-trip, trimming
/// trailing zeroes so emitted path data stays compact.
fn fmt_num(v: F) -> String {
    let s = format!("{v:.6}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lowers an SVG `<line>` to path data, per SVG 1.1's normative
/// equivalence: `M x1,y1 L x2,y2`.
pub fn line_path(x1: F, y1: F, x2: F, y2: F) -> String {
    format!("M{},{} L{},{}", fmt_num(x1), fmt_num(y1), fmt_num(x2), fmt_num(y2))
}

/// Lowers an SVG `<polyline>` to path data: a moveto to the first point
/// followed by linetos to the rest, left open (no closing `Z`).
pub fn polyline_path(points: &[(F, F)]) -> String {
    polyline_or_polygon(points, false)
}

/// Lowers an SVG `<polygon>` to path data: like [`polyline_path`] but with
/// a trailing `Z` closing the shape back to the first point.
pub fn polygon_path(points: &[(F, F)]) -> String {
    polyline_or_polygon(points, true)
}

fn polyline_or_polygon(points: &[(F, F)], close: bool) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = format!("M{},{}", fmt_num(points[0].0), fmt_num(points[0].1));
    for &(x, y) in &points[1..] {
        d.push_str(&format!(" L{},{}", fmt_num(x), fmt_num(y)));
    }
    if close {
        d.push_str(" Z");
    }
    d
}

/// Lowers an SVG `<rect>` to path data. A rect with either radius zero (or
/// unset) lowers to a plain four-cornered path; a rect with both radii set
/// lowers to the rounded-corner path built from four quarter-arcs, per the
/// SVG 1.1 normative equivalence in Appendix, walking clockwise from the
/// top edge.
pub fn rect_path(x: F, y: F, width: F, height: F, rx: F, ry: F) -> String {
    if width <= 0.0 || height <= 0.0 {
        return String::new();
    }
    let rx = rx.min(width / 2.0);
    let ry = ry.min(height / 2.0);
    if rx <= 0.0 || ry <= 0.0 {
        return format!(
            "M{},{} H{} V{} H{} Z",
            fmt_num(x),
            fmt_num(y),
            fmt_num(x + width),
            fmt_num(y + height),
            fmt_num(x)
        );
    }
    format!(
        "M{},{} H{} A{},{} 0 0 1 {},{} V{} A{},{} 0 0 1 {},{} H{} A{},{} 0 0 1 {},{} V{} A{},{} 0 0 1 {},{} Z",
        fmt_num(x + rx),
        fmt_num(y),
        fmt_num(x + width - rx),
        fmt_num(rx),
        fmt_num(ry),
        fmt_num(x + width),
        fmt_num(y + ry),
        fmt_num(y + height - ry),
        fmt_num(rx),
        fmt_num(ry),
        fmt_num(x + width - rx),
        fmt_num(y + height),
        fmt_num(x + rx),
        fmt_num(rx),
        fmt_num(ry),
        fmt_num(x),
        fmt_num(y + height - ry),
        fmt_num(y + ry),
        fmt_num(rx),
        fmt_num(ry),
        fmt_num(x + rx),
        fmt_num(y),
    )
}

/// Lowers an SVG `<circle>` to path data, as two half-circle arcs so the
/// evaluator's generic arc-flattening path applies without a dedicated
/// circle command in the AST.
pub fn circle_path(cx: F, cy: F, r: F) -> String {
    ellipse_path(cx, cy, r, r)
}

/// Lowers an SVG `<ellipse>` to path data, as two half-ellipse arcs from
/// the leftmost point, matching the normative circle/ellipse equivalence.
pub fn ellipse_path(cx: F, cy: F, rx: F, ry: F) -> String {
    if rx <= 0.0 || ry <= 0.0 {
        return String::new();
    }
    format!(
        "M{},{} A{},{} 0 1 0 {},{} A{},{} 0 1 0 {},{} Z",
        fmt_num(cx - rx),
        fmt_num(cy),
        fmt_num(rx),
        fmt_num(ry),
        fmt_num(cx + rx),
        fmt_num(cy),
        fmt_num(rx),
        fmt_num(ry),
        fmt_num(cx - rx),
        fmt_num(cy),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_path;

    #[test]
    fn line_round_trips_through_parser() {
        let d = line_path(1.0, 2.0, 3.0, 4.0);
        assert!(parse_path(&d).is_ok());
    }

    #[test]
    fn polygon_closes_with_z() {
        let d = polygon_path(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        assert!(d.ends_with('Z'));
        assert!(parse_path(&d).is_ok());
    }

    #[test]
    fn polyline_does_not_close() {
        let d = polyline_path(&[(0.0, 0.0), (10.0, 0.0)]);
        assert!(!d.ends_with('Z'));
    }

    #[test]
    fn sharp_rect_is_four_lines() {
        let d = rect_path(0.0, 0.0, 10.0, 5.0, 0.0, 0.0);
        assert!(!d.contains('A'));
        assert!(parse_path(&d).is_ok());
    }

    #[test]
    fn rounded_rect_uses_arcs() {
        let d = rect_path(0.0, 0.0, 10.0, 10.0, 2.0, 2.0);
        assert!(d.contains('A'));
        assert!(parse_path(&d).is_ok());
    }

    #[test]
    fn circle_lowers_to_two_arcs() {
        let d = circle_path(5.0, 5.0, 3.0);
        assert_eq!(d.matches('A').count(), 2);
        assert!(parse_path(&d).is_ok());
    }

    #[test]
    fn degenerate_shapes_are_empty() {
        assert_eq!(rect_path(0.0, 0.0, 0.0, 10.0, 0.0, 0.0), "");
        assert_eq!(ellipse_path(0.0, 0.0, 0.0, 5.0), "");
        assert_eq!(polyline_path(&[]), "");
    }
}

//! Stitches the ordered per-leaf segments into one finished [`Program`]:
//! a prefix (raw profile header, unit/extrusion/feed setup, travel to the
//! first segment), the body with inter-segment retract/travel stitches,
//! a suffix (final retract, raw profile footer), and a prepended summary
//! comment. Grounded in Go `convert.go`'s top-level assembly step and the
//! motion builder's own emitter shape.

use std::sync::OnceLock;

use regex::Regex;

use svgplot_config::{PlotterConfig, RuntimeConfig};
use svgplot_geom::V3;
use svgplot_motion::{Mode, MotionBuilder, Program, Segment};

fn instruction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[GMTgmt]\d+[^;]*").unwrap())
}

/// Euclidean separation below which two points are treated as the same
/// target, so a zero-length stitch is never emitted between a segment's
/// logical end and the next one's logical start.
const COINCIDENT_EPSILON: f64 = 1e-9;

fn fold_in(program: &mut Program, piece: &Segment) {
    program.code.extend(piece.code.iter().cloned());
    program.bmin = program.bmin.min(piece.bmin);
    program.bmax = program.bmax.max(piece.bmax);
    program.end = piece.end;
}

fn needs_stitch(a_end: V3, b_start: V3) -> bool {
    a_end.distance(b_start) > COINCIDENT_EPSILON
}

/// Assembles the ordered segment list into a finished program. Never
/// fails: every input has already passed through the fallible decode,
/// walk and evaluation stages, and assembly only composes and counts text
/// that's already been produced by those stages.
pub fn assemble(segments: Vec<Segment>, profile: &PlotterConfig, cfg: &RuntimeConfig) -> Program {
    let mut program = Segment::empty();
    program.start = segments.first().map(|s| s.start).unwrap_or(V3::splat(0.0));

    let mut prefix = MotionBuilder::new(cfg);
    prefix.raw(&profile.gprefix);
    prefix.set_unit(profile.length_unit);
    prefix.set_extrusion(0.0, Mode::Travel);
    prefix.set_extrusion(0.0, Mode::Draw);
    prefix.set_speed(cfg.draw_speed, Mode::Draw);
    prefix.set_speed(cfg.retract_speed, Mode::Travel);
    if let Some(first) = segments.first() {
        prefix.mv(V3::new(first.start.x, first.start.y, cfg.retract_height), cfg.retract_speed);
    }
    let prefix_seg = prefix.finish();
    fold_in(&mut program, &prefix_seg);

    let mut pen_at = prefix_seg.end;
    for seg in &segments {
        if needs_stitch(pen_at, seg.start) {
            let mut stitch = MotionBuilder::resume(cfg, pen_at);
            stitch.retract();
            stitch.move_retracted(seg.start.xy());
            fold_in(&mut program, &stitch.finish());
        }
        fold_in(&mut program, seg);
        pen_at = seg.end;
    }

    let mut suffix = MotionBuilder::resume(cfg, pen_at);
    suffix.retract();
    suffix.raw(&profile.gsuffix);
    fold_in(&mut program, &suffix.finish());

    let instruction_count = program.code.iter().filter(|l| instruction_regex().is_match(l)).count();
    let summary = vec![
        format!("; unit: {}", profile.length_unit.name()),
        format!(
            "; bounds: x=[{:.3},{:.3}] y=[{:.3},{:.3}] z=[{:.3},{:.3}]",
            program.bmin.x, program.bmax.x, program.bmin.y, program.bmax.y, program.bmin.z, program.bmax.z
        ),
        format!("; instructions: {instruction_count}"),
    ];

    let mut code = summary;
    code.extend(program.code);
    program.code = if profile.remove_comments { strip_comments(code) } else { code };

    if out_of_bounds(&program, profile) {
        log::warn!(
            "program bounds x=[{:.3},{:.3}] y=[{:.3},{:.3}] z=[{:.3},{:.3}] extend outside the plate",
            program.bmin.x, program.bmax.x, program.bmin.y, program.bmax.y, program.bmin.z, program.bmax.z
        );
    }

    program
}

fn strip_comments(lines: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        if line.trim_start().starts_with(';') {
            continue;
        }
        let stripped = match line.find(';') {
            Some(idx) => line[..idx].trim_end().to_string(),
            None => line,
        };
        if !stripped.is_empty() {
            out.push(stripped);
        }
    }
    out
}

fn out_of_bounds(program: &Program, profile: &PlotterConfig) -> bool {
    let below = program.bmin.x < profile.plate_min.x
        || program.bmin.y < profile.plate_min.y
        || program.bmin.z < profile.plate_min.z;
    let above = program.bmax.x > profile.plate_max.x
        || program.bmax.y > profile.plate_max.y
        || program.bmax.z > profile.plate_max.z;
    below || above
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgplot_geom::{Unit, V2};

    fn profile() -> PlotterConfig {
        PlotterConfig {
            gprefix: "G28\nG21\n".to_string(),
            gsuffix: "M84\n".to_string(),
            length_unit: Unit::Mm,
            plate_center: V2::ZERO,
            plate_min: V3::splat(0.0),
            plate_max: V3::new(100.0, 100.0, 10.0),
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

    fn cfg(profile: &PlotterConfig) -> RuntimeConfig {
        RuntimeConfig::from_plotter(profile, Unit::Mm)
    }

    fn seg_at(start: (f64, f64), end: (f64, f64)) -> Segment {
        let mut s = Segment::empty();
        s.start = V3::new(start.0, start.1, 0.0);
        s.end = V3::new(end.0, end.1, 0.0);
        s.bmin = s.start.min(s.end);
        s.bmax = s.start.max(s.end);
        s.code = vec![format!("G1 X{} Y{} Z0 F1500", end.0, end.1)];
        s
    }

    #[test]
    fn prefix_and_suffix_raw_text_survive_assembly() {
        let profile = profile();
        let program = assemble(vec![], &profile, &cfg(&profile));
        assert!(program.code.iter().any(|l| l == "G28"));
        assert!(program.code.iter().any(|l| l == "M84"));
    }

    #[test]
    fn gap_between_segments_inserts_a_stitch() {
        let profile = profile();
        let a = seg_at((0.0, 0.0), (10.0, 0.0));
        let b = seg_at((50.0, 50.0), (60.0, 50.0));
        let program = assemble(vec![a, b], &profile, &cfg(&profile));
        let travels: Vec<_> = program.code.iter().filter(|l| l.starts_with("G0 X50")).collect();
        assert_eq!(travels.len(), 1);
    }

    #[test]
    fn no_stitch_when_segments_already_touch() {
        let profile = profile();
        let a = seg_at((0.0, 0.0), (10.0, 0.0));
        let b = seg_at((10.0, 0.0), (20.0, 0.0));
        let program = assemble(vec![a, b], &profile, &cfg(&profile));
        let travels = program.code.iter().filter(|l| l.starts_with("G0 X10")).count();
        assert_eq!(travels, 0);
    }

    #[test]
    fn summary_comment_is_prepended_with_instruction_count() {
        let profile = profile();
        let a = seg_at((0.0, 0.0), (10.0, 0.0));
        let program = assemble(vec![a], &profile, &cfg(&profile));
        assert!(program.code[0].starts_with("; unit: mm"));
        assert!(program.code.iter().any(|l| l.starts_with("; instructions:")));
    }

    #[test]
    fn remove_comments_strips_every_comment_line_including_summary() {
        let mut profile = profile();
        profile.remove_comments = true;
        let a = seg_at((0.0, 0.0), (10.0, 0.0));
        let program = assemble(vec![a], &profile, &cfg(&profile));
        assert!(program.code.iter().all(|l| !l.trim_start().starts_with(';')));
    }

    #[test]
    fn out_of_plate_bounds_only_warns() {
        let profile = profile();
        let a = seg_at((0.0, 0.0), (500.0, 0.0));
        let program = assemble(vec![a], &profile, &cfg(&profile));
        assert!(program.bmax.x > profile.plate_max.x);
    }
}

use svgplot_geom::{Unit, F, V2, V3};
use svgplot_config::RuntimeConfig;

use crate::segment::Segment;

/// Whether an extrusion or feed-rate word belongs to a travel (`G0`) move
/// or a drawing (`G1`) move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Travel,
    Draw,
}

fn fmt_num(v: F) -> String {
    let s = format!("{v:.6}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Emits one instruction at a time into a [`Segment`], tracking bounds and
/// the pen's current position as a side effect of every emission. This is
/// the only place in the evaluator that composes G-code text by hand.
pub struct MotionBuilder<'a> {
    seg: Segment,
    cfg: &'a RuntimeConfig,
}

impl<'a> MotionBuilder<'a> {
    pub fn new(cfg: &'a RuntimeConfig) -> Self {
        MotionBuilder { seg: Segment::empty(), cfg }
    }

    /// Starts a builder whose current pen position is already `at`, rather
    /// than the origin. Used for assembly-level stitch segments inserted
    /// between two evaluated segments, where `retract`/`draw_pos`'s
    /// Z-only emission needs the right X/Y to carry forward.
    pub fn resume(cfg: &'a RuntimeConfig, at: V3) -> Self {
        let mut seg = Segment::empty();
        seg.end = at;
        MotionBuilder { seg, cfg }
    }

    pub fn comment(&mut self, text: &str) {
        self.seg.code.push(format!("; {text}"));
    }

    /// Pushes a block of raw G-code text (the plotter profile's prefix or
    /// suffix string) line by line, verbatim, skipping blank lines. These
    /// lines don't move through [`Segment::record_target`] since their
    /// effect (homing, motor disable) isn't expressible as an X/Y/Z target.
    pub fn raw(&mut self, text: &str) {
        for line in text.lines() {
            if !line.is_empty() {
                self.seg.code.push(line.to_string());
            }
        }
    }

    pub fn set_unit(&mut self, unit: Unit) {
        match unit {
            Unit::Mm => self.seg.code.push("G21".to_string()),
            Unit::In => self.seg.code.push("G20".to_string()),
            other => self.seg.code.push(format!("; unsupported device unit '{}' ignored", other.name())),
        }
    }

    pub fn set_extrusion(&mut self, speed: F, mode: Mode) {
        let word = match mode {
            Mode::Travel => "G0",
            Mode::Draw => "G1",
        };
        self.seg.code.push(format!("{word} E{}", fmt_num(speed)));
    }

    pub fn set_speed(&mut self, speed: F, mode: Mode) {
        let word = match mode {
            Mode::Travel => "G0",
            Mode::Draw => "G1",
        };
        self.seg.code.push(format!("{word} F{}", fmt_num(speed)));
    }

    fn emit_xyz(&mut self, word: &str, target: V3, feed: F) {
        self.seg.code.push(format!(
            "{word} X{} Y{} Z{} F{}",
            fmt_num(target.x),
            fmt_num(target.y),
            fmt_num(target.z),
            fmt_num(feed)
        ));
        self.seg.record_target(target);
    }

    /// Emits a Z-only move at the pen's current X/Y (used by `retract`/
    /// `draw_pos`, where only the pen height actually changes).
    fn emit_z(&mut self, word: &str, z: F, feed: F) {
        self.seg.code.push(format!("{word} Z{} F{}", fmt_num(z), fmt_num(feed)));
        let target = V3::new(self.seg.end.x, self.seg.end.y, z);
        self.seg.record_target(target);
    }

    /// Raises Z to retract height at the pen's current X/Y.
    pub fn retract(&mut self) {
        self.emit_z("G0", self.cfg.retract_height, self.cfg.retract_speed);
    }

    /// Lowers Z to draw height at the pen's current X/Y.
    pub fn draw_pos(&mut self) {
        self.emit_z("G1", self.cfg.draw_height, self.cfg.draw_speed);
    }

    pub fn move_retracted(&mut self, xy: V2) {
        let target = V3::new(xy.x, xy.y, self.cfg.retract_height);
        self.emit_xyz("G0", target, self.cfg.retract_speed);
    }

    pub fn draw(&mut self, xy: V2) {
        let target = V3::new(xy.x, xy.y, self.cfg.draw_height);
        self.emit_xyz("G1", target, self.cfg.draw_speed);
    }

    pub fn mv(&mut self, xyz: V3, speed: F) {
        self.emit_xyz("G0", xyz, speed);
    }

    /// Emits a native `G2`/`G3` arc around the pen's current position,
    /// `centre_offset` away, widening bounds by the implied circle without
    /// sampling points along it.
    pub fn draw_circle(&mut self, centre_offset: V2, radius: F, clockwise: bool) {
        let word = if clockwise { "G2" } else { "G3" };
        self.seg.code.push(format!(
            "{word} I{} J{} F{}",
            fmt_num(centre_offset.x),
            fmt_num(centre_offset.y),
            fmt_num(self.cfg.draw_speed)
        ));
        let centre = V2::new(self.seg.end.x + centre_offset.x, self.seg.end.y + centre_offset.y);
        let z = self.seg.end.z;
        let bmin = V3::new(centre.x - radius, centre.y - radius, z);
        let bmax = V3::new(centre.x + radius, centre.y + radius, z);
        self.seg.bmin = self.seg.bmin.min(bmin);
        self.seg.bmax = self.seg.bmax.max(bmax);
    }

    pub fn finish(self) -> Segment {
        self.seg
    }
}

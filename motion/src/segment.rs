use svgplot_geom::{F, V3};

/// A contiguous run of emitted G-code plus the bounding information an
/// ordering stage needs: the position the pen is at when the segment
/// starts and ends, and the axis-aligned box enclosing every target
/// position emitted (including retract travel).
///
/// `bmin`/`bmax` start at `+inf`/`-inf` per axis so the first emitted
/// target always binds them; an unused segment (no emission at all) keeps
/// the sentinel values rather than reporting a misleading zero-sized box.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub code: Vec<String>,
    pub start: V3,
    pub end: V3,
    pub bmin: V3,
    pub bmax: V3,
}

impl Segment {
    pub fn empty() -> Self {
        Segment {
            code: Vec::new(),
            start: V3::default(),
            end: V3::default(),
            bmin: V3::splat(F::INFINITY),
            bmax: V3::splat(F::NEG_INFINITY),
        }
    }

    /// Records `p` as an emitted target: widens the bounds and updates
    /// `end` to track the pen's current position.
    pub fn record_target(&mut self, p: V3) {
        self.bmin = self.bmin.min(p);
        self.bmax = self.bmax.max(p);
        self.end = p;
    }

    pub fn line_count(&self) -> usize {
        self.code.len()
    }
}

/// The assembled document-level program has the same shape as a
/// [`Segment`]: code, endpoints, bounds.
pub type Program = Segment;

#![doc(html_logo_url = "https://nical.github.io/lyon-doc/lyon-logo.svg")]

//! Segment ordering strategies. Each takes the evaluator's per-leaf
//! segment list and returns a permutation of it chosen to minimise
//! non-drawing travel distance between segments; none of them ever touch
//! a segment's own emitted code.

use svgplot_geom::F;
use svgplot_motion::Segment;

/// The injectable ordering strategy a caller selects, e.g. from a CLI
/// flag. `TwoOpt` is the default — it never does worse than `Greedy` on
/// the same input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    Identity,
    Reverse,
    NumInstructions { desc: bool },
    Greedy,
    TwoOpt,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::TwoOpt
    }
}

/// Total Euclidean travel between consecutive segments: `sum(dist(s[i].end,
/// s[i+1].start))`. This is the cost every strategy but `Identity`/
/// `Reverse`/`NumInstructions` is trying to reduce.
pub fn cost(segments: &[Segment]) -> F {
    segments.windows(2).map(|w| w[0].end.distance(w[1].start)).sum()
}

pub fn order(segments: Vec<Segment>, strategy: Strategy) -> Vec<Segment> {
    match strategy {
        Strategy::Identity => segments,
        Strategy::Reverse => reverse(segments),
        Strategy::NumInstructions { desc } => num_instructions(segments, desc),
        Strategy::Greedy => greedy(segments),
        Strategy::TwoOpt => two_opt(segments),
    }
}

fn reverse(mut segments: Vec<Segment>) -> Vec<Segment> {
    segments.reverse();
    segments
}

fn num_instructions(mut segments: Vec<Segment>, desc: bool) -> Vec<Segment> {
    if desc {
        segments.sort_by(|a, b| b.line_count().cmp(&a.line_count()));
    } else {
        segments.sort_by(|a, b| a.line_count().cmp(&b.line_count()));
    }
    segments
}

/// Keeps segment 0 as the fixed start, then repeatedly appends whichever
/// remaining candidate's start is Euclidean-closest to the tour's current
/// end. O(n^2) time, O(n) extra space; removal is swap-with-last so it
/// never shifts the remaining candidates.
fn greedy(mut segments: Vec<Segment>) -> Vec<Segment> {
    if segments.len() <= 1 {
        return segments;
    }
    let mut ordered = Vec::with_capacity(segments.len());
    let first = segments.remove(0);
    let mut current_end = first.end;
    ordered.push(first);

    while !segments.is_empty() {
        let mut best_idx = 0;
        let mut best_dist = F::INFINITY;
        for (i, s) in segments.iter().enumerate() {
            let d = current_end.distance(s.start);
            if d < best_dist {
                best_dist = d;
                best_idx = i;
            }
        }
        let chosen = segments.swap_remove(best_idx);
        current_end = chosen.end;
        ordered.push(chosen);
    }
    ordered
}

/// Classic open-tour 2-opt: repeatedly reverses a sub-range `[i..=j]` when
/// doing so strictly lowers total cost, until a full pass finds no
/// improvement. Endpoints (segment 0 and the last segment) are held
/// fixed, since segment 0 feeds from the assembly prefix.
///
/// Seeded from the greedy nearest-neighbour tour rather than input order:
/// 2-opt only ever accepts strictly-improving swaps, so starting from
/// greedy's tour guarantees the result costs no more than greedy's alone.
/// Starting from an arbitrary input order gives no such guarantee — a
/// short list can have too few valid swap ranges to escape a worse local
/// optimum.
fn two_opt(segments: Vec<Segment>) -> Vec<Segment> {
    let mut segments = greedy(segments);
    let n = segments.len();
    let mut improved = true;
    while improved {
        improved = false;
        let mut best_cost = cost(&segments);
        for i in 1..=n.saturating_sub(3) {
            for j in (i + 1)..=n.saturating_sub(2) {
                segments[i..=j].reverse();
                let c = cost(&segments);
                if c < best_cost {
                    best_cost = c;
                    improved = true;
                } else {
                    segments[i..=j].reverse();
                }
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use svgplot_geom::V3;

    fn seg_at(start: (F, F), end: (F, F)) -> Segment {
        let mut s = Segment::empty();
        s.start = V3::new(start.0, start.1, 0.0);
        s.end = V3::new(end.0, end.1, 0.0);
        s
    }

    #[test]
    fn reverse_flips_order() {
        let a = seg_at((0.0, 0.0), (0.0, 0.0));
        let b = seg_at((100.0, 0.0), (100.0, 0.0));
        let c = seg_at((10.0, 0.0), (10.0, 0.0));
        let result = order(vec![a.clone(), b.clone(), c.clone()], Strategy::Reverse);
        assert_eq!(result[0].start, c.start);
        assert_eq!(result[2].start, a.start);
    }

    #[test]
    fn greedy_picks_nearest_neighbour() {
        let a = seg_at((0.0, 0.0), (0.0, 0.0));
        let b = seg_at((100.0, 0.0), (100.0, 0.0));
        let c = seg_at((10.0, 0.0), (10.0, 0.0));
        let result = greedy(vec![a, b, c]);
        assert_eq!(result[0].start, V3::new(0.0, 0.0, 0.0));
        assert_eq!(result[1].start, V3::new(10.0, 0.0, 0.0));
        assert_eq!(result[2].start, V3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn two_opt_never_worse_than_greedy() {
        let a = seg_at((0.0, 0.0), (0.0, 0.0));
        let b = seg_at((100.0, 0.0), (100.0, 0.0));
        let c = seg_at((10.0, 0.0), (10.0, 0.0));
        let d = seg_at((90.0, 5.0), (90.0, 5.0));
        let greedy_cost = cost(&greedy(vec![a.clone(), b.clone(), c.clone(), d.clone()]));
        let opt_cost = cost(&two_opt(vec![a, b, c, d]));
        assert!(opt_cost <= greedy_cost);
    }

    #[test]
    fn two_opt_keeps_first_segment_first() {
        let a = seg_at((0.0, 0.0), (0.0, 0.0));
        let b = seg_at((100.0, 0.0), (100.0, 0.0));
        let c = seg_at((10.0, 0.0), (10.0, 0.0));
        let d = seg_at((90.0, 5.0), (90.0, 5.0));
        let result = two_opt(vec![a.clone(), b, c, d]);
        assert_eq!(result[0].start, a.start);
    }

    #[test]
    fn num_instructions_sorts_by_line_count_stable() {
        let mut short = Segment::empty();
        short.code = vec!["G1 X0".to_string()];
        let mut long = Segment::empty();
        long.code = vec!["G1 X0".to_string(), "G1 X1".to_string()];
        let result = num_instructions(vec![long.clone(), short.clone()], false);
        assert_eq!(result[0].code.len(), 1);
        assert_eq!(result[1].code.len(), 2);
    }
}

use regex::Regex;
use std::sync::OnceLock;

use crate::angle::{Deg, Rad};
use crate::matrix::M3;
use crate::vector::V2;

/// One SVG transform-list function, already parsed into typed arguments.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Transform {
    Translate { offset: V2 },
    Scale { factor: V2 },
    Rotate { angle: Rad, pivot: V2 },
    Skew { angles: (Rad, Rad) },
    Mirror { mx: bool, my: bool, centre: V2 },
    Matrix { m: M3 },
}

impl Transform {
    pub fn to_matrix(&self) -> M3 {
        match *self {
            Transform::Translate { offset } => M3([
                1.0, 0.0, offset.x,
                0.0, 1.0, offset.y,
                0.0, 0.0, 1.0,
            ]),
            Transform::Scale { factor } => M3([
                factor.x, 0.0, 0.0,
                0.0, factor.y, 0.0,
                0.0, 0.0, 1.0,
            ]),
            Transform::Rotate { angle, pivot } => {
                let to_origin = Transform::Translate { offset: V2::new(-pivot.x, -pivot.y) };
                let back = Transform::Translate { offset: pivot };
                let (s, c) = (angle.sin(), angle.cos());
                let rotation = M3([
                    c, -s, 0.0,
                    s, c, 0.0,
                    0.0, 0.0, 1.0,
                ]);
                back.to_matrix().mul(&rotation).mul(&to_origin.to_matrix())
            }
            Transform::Skew { angles } => M3([
                1.0, angles.0.tan(), 0.0,
                angles.1.tan(), 1.0, 0.0,
                0.0, 0.0, 1.0,
            ]),
            Transform::Mirror { mx, my, centre } => {
                let sx = if mx { -1.0 } else { 1.0 };
                let sy = if my { -1.0 } else { 1.0 };
                let to_origin = Transform::Translate { offset: V2::new(-centre.x, -centre.y) };
                let back = Transform::Translate { offset: centre };
                let scale = Transform::Scale { factor: V2::new(sx, sy) };
                back.to_matrix().mul(&scale.to_matrix()).mul(&to_origin.to_matrix())
            }
            Transform::Matrix { m } => m,
        }
    }

    pub fn apply(&self, p: V2) -> V2 {
        self.to_matrix().apply(p)
    }
}

/// An ordered sequence of [`Transform`]s. Folding left-to-right via matrix
/// multiplication yields a single [`M3`]; applying the chain to a point is
/// defined as applying that folded matrix. An empty chain folds to
/// identity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformChain(pub Vec<Transform>);

impl TransformChain {
    pub fn new() -> Self {
        TransformChain(Vec::new())
    }

    pub fn push(&mut self, t: Transform) {
        self.0.push(t);
    }

    /// Appends `other`'s transforms after this chain's own. Folding is
    /// left-to-right but application is right-to-left, so `other` ends up
    /// closest to the point and `self` wraps around the outside (this
    /// models composing a parent chain with a child's own transform
    /// attribute: the child's transform applies first).
    pub fn then(mut self, mut other: TransformChain) -> TransformChain {
        self.0.append(&mut other.0);
        self
    }

    pub fn to_matrix(&self) -> M3 {
        self.0
            .iter()
            .fold(M3::IDENTITY, |acc, t| acc.mul(&t.to_matrix()))
    }

    pub fn apply(&self, p: V2) -> V2 {
        self.to_matrix().apply(p)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransformParseError {
    #[error("unknown transform function '{0}'")]
    UnknownFunction(String),
    #[error("transform function '{name}' expects {expected} argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: &'static str,
        got: usize,
    },
    #[error("malformed numeric argument '{0}' in transform list")]
    BadNumber(String),
}

fn call_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Za-z]+)\s*\(([^)]*)\)").unwrap())
}

fn arg_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s,]+").unwrap())
}

fn parse_args(raw: &str) -> Result<Vec<f64>, TransformParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    arg_separator()
        .split(trimmed)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| TransformParseError::BadNumber(s.to_string())))
        .collect()
}

fn expect_arity(name: &str, args: &[f64], expected: &[usize], label: &'static str) -> Result<(), TransformParseError> {
    if expected.contains(&args.len()) {
        Ok(())
    } else {
        Err(TransformParseError::WrongArity {
            name: name.to_string(),
            expected: label,
            got: args.len(),
        })
    }
}

/// Parses a lenient `name(arg[, arg]*)` transform-function list, as found
/// in SVG `transform` attributes. Whitespace and/or commas separate both
/// calls and arguments. Unknown function names are reported and skipped
/// rather than aborting the whole chain; wrong argument parity is a fatal
/// parse error for that call.
pub fn parse_transform_list(s: &str) -> Result<(TransformChain, Vec<String>), TransformParseError> {
    let mut chain = TransformChain::new();
    let mut skipped = Vec::new();
    for caps in call_regex().captures_iter(s) {
        let name = &caps[1];
        let args = parse_args(&caps[2])?;
        match name {
            "matrix" => {
                expect_arity(name, &args, &[6], "6")?;
                chain.push(Transform::Matrix {
                    m: M3::from_svg_matrix(args[0], args[1], args[2], args[3], args[4], args[5]),
                });
            }
            "translate" => {
                expect_arity(name, &args, &[2], "2")?;
                chain.push(Transform::Translate { offset: V2::new(args[0], args[1]) });
            }
            "translateX" => {
                expect_arity(name, &args, &[1], "1")?;
                chain.push(Transform::Translate { offset: V2::new(args[0], 0.0) });
            }
            "translateY" => {
                expect_arity(name, &args, &[1], "1")?;
                chain.push(Transform::Translate { offset: V2::new(0.0, args[0]) });
            }
            "scale" => {
                expect_arity(name, &args, &[2], "2")?;
                chain.push(Transform::Scale { factor: V2::new(args[0], args[1]) });
            }
            "scaleX" => {
                expect_arity(name, &args, &[1], "1")?;
                chain.push(Transform::Scale { factor: V2::new(args[0], 1.0) });
            }
            "scaleY" => {
                expect_arity(name, &args, &[1], "1")?;
                chain.push(Transform::Scale { factor: V2::new(1.0, args[0]) });
            }
            "rotate" => {
                expect_arity(name, &args, &[1, 3], "1 or 3")?;
                let pivot = if args.len() == 3 { V2::new(args[1], args[2]) } else { V2::ZERO };
                chain.push(Transform::Rotate { angle: Deg(args[0]).to_rad(), pivot });
            }
            "skew" => {
                expect_arity(name, &args, &[2], "2")?;
                chain.push(Transform::Skew { angles: (Deg(args[0]).to_rad(), Deg(args[1]).to_rad()) });
            }
            "skewX" => {
                expect_arity(name, &args, &[1], "1")?;
                chain.push(Transform::Skew { angles: (Deg(args[0]).to_rad(), Rad(0.0)) });
            }
            "skewY" => {
                expect_arity(name, &args, &[1], "1")?;
                chain.push(Transform::Skew { angles: (Rad(0.0), Deg(args[0]).to_rad()) });
            }
            other => {
                skipped.push(other.to_string());
            }
        }
    }
    Ok((chain, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_then_scale() {
        let (chain, _) = parse_transform_list("translate(3,4) scale(2,2)").unwrap();
        assert_eq!(chain.apply(V2::new(1.0, 1.0)), V2::new(5.0, 6.0));
    }

    #[test]
    fn mirror_y_about_centre() {
        let m = Transform::Mirror { mx: false, my: true, centre: V2::new(0.0, 150.0) };
        let p = m.apply(V2::new(10.0, 20.0));
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 280.0).abs() < 1e-9);
    }

    #[test]
    fn empty_chain_is_identity() {
        let chain = TransformChain::new();
        let p = V2::new(7.0, -3.0);
        assert_eq!(chain.apply(p), p);
    }

    #[test]
    fn unknown_function_is_skipped_not_fatal() {
        let (chain, skipped) = parse_transform_list("frobnicate(1,2,3) translate(1,2)").unwrap();
        assert_eq!(skipped, vec!["frobnicate".to_string()]);
        assert_eq!(chain.0.len(), 1);
    }

    #[test]
    fn wrong_arity_is_fatal() {
        let err = parse_transform_list("translate(1)").unwrap_err();
        assert!(matches!(err, TransformParseError::WrongArity { .. }));
    }

    #[test]
    fn rotate_one_or_three_args() {
        assert!(parse_transform_list("rotate(90)").is_ok());
        assert!(parse_transform_list("rotate(90,1,1)").is_ok());
        assert!(parse_transform_list("rotate(90,1)").is_err());
    }
}

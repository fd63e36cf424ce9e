use regex::Regex;
use std::sync::OnceLock;

use crate::scalar::F;

/// A closed enumeration of the length units svgplot understands. The
/// device interface only ever speaks `Mm`/`In`; `Cm`/`Pt`/`Px` are
/// accepted on the SVG side and converted through millimetres.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Mm,
    Cm,
    In,
    Pt,
    Px,
}

impl Unit {
    /// One unit of `self`, expressed in millimetres.
    fn mm_per_unit(self) -> F {
        match self {
            Unit::Mm => 1.0,
            Unit::Cm => 10.0,
            Unit::In => 25.4,
            Unit::Pt => 25.4 / 72.0,
            Unit::Px => 25.4 / 96.0,
        }
    }

    pub fn parse(s: &str) -> Option<Unit> {
        match s {
            "mm" => Some(Unit::Mm),
            "cm" => Some(Unit::Cm),
            "in" => Some(Unit::In),
            "pt" => Some(Unit::Pt),
            "px" => Some(Unit::Px),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::In => "in",
            Unit::Pt => "pt",
            Unit::Px => "px",
        }
    }
}

/// Converts a scalar (a length, or a speed in length-units-per-minute)
/// from one unit to another, via millimetres as the pivot.
pub fn convert(value: F, from: Unit, to: Unit) -> F {
    value * from.mm_per_unit() / to.mm_per_unit()
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UnitParseError {
    #[error("'{0}' does not match the expected number-then-unit form")]
    Malformed(String),
    #[error("'{0}' is not a recognised length unit")]
    UnknownUnit(String),
}

fn number_unit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]*\.?[0-9]+)([a-zA-Z%µ]+)$").unwrap())
}

/// Parses a string such as `"32mm"` or `"1.5in"` into a scalar and its
/// [`Unit`]. Fails to match `^([0-9]*\.?[0-9]+)([a-zA-Z%µ]+)$` is a fatal
/// parse error for the caller; an unrecognised unit suffix is reported
/// distinctly so a diagnostic can name it.
pub fn parse_number_unit(s: &str) -> Result<(F, Unit), UnitParseError> {
    let s = s.trim();
    let caps = number_unit_regex()
        .captures(s)
        .ok_or_else(|| UnitParseError::Malformed(s.to_string()))?;
    let number: F = caps[1]
        .parse()
        .map_err(|_| UnitParseError::Malformed(s.to_string()))?;
    let unit = Unit::parse(&caps[2]).ok_or_else(|| UnitParseError::UnknownUnit(caps[2].to_string()))?;
    Ok((number, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cm_to_mm() {
        assert_eq!(convert(1.0, Unit::Cm, Unit::Mm), 10.0);
    }

    #[test]
    fn in_to_mm() {
        assert_eq!(convert(1.0, Unit::In, Unit::Mm), 25.4);
    }

    #[test]
    fn parse_ok() {
        assert_eq!(parse_number_unit("32mm"), Ok((32.0, Unit::Mm)));
        assert_eq!(parse_number_unit("1.5in"), Ok((1.5, Unit::In)));
    }

    #[test]
    fn parse_rejects_unitless() {
        assert!(parse_number_unit("32").is_err());
    }

    #[test]
    fn parse_rejects_unknown_unit() {
        assert_eq!(
            parse_number_unit("3foo"),
            Err(UnitParseError::UnknownUnit("foo".to_string()))
        );
    }
}

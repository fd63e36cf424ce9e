#![doc(html_logo_url = "https://nical.github.io/lyon-doc/lyon-logo.svg")]

//! The SVG path-data mini-language: tokenizer, recursive-descent parser,
//! command AST, and shape-to-path-data lowering.
//!
//! This crate implements the `d` attribute grammar from SVG 1.1 (the
//! `M/L/H/V/C/S/Q/T/A/Z` command set, absolute and relative forms) with one
//! documented extension: a mixture of spaces and commas between numeric
//! tokens is treated as a single separator, and a sign may directly abut
//! the previous number with no separator at all.

pub use svgplot_geom::F;

mod ast;
mod parser;
mod lowering;

pub use crate::ast::{ArcArg, PathCommand};
pub use crate::parser::{parse_path, ParseError};
pub use crate::lowering::{circle_path, ellipse_path, line_path, polygon_path, polyline_path, rect_path};

#![doc(html_logo_url = "https://nical.github.io/lyon-doc/lyon-logo.svg")]

//! Scalars, vectors, matrices and 2D affine transform algebra.
//!
//! # Overview
//!
//! This crate implements the small numeric kernel the rest of svgplot is
//! built on:
//!
//! - a single floating point scalar `F` (`f64`),
//! - 2D/3D/4D vectors with componentwise min/max and distance,
//! - row-major 3x3 and 4x4 matrices,
//! - radian/degree angle wrappers that cannot be crossed by accident,
//! - a length unit enum with mm as the pivot for conversion,
//! - the SVG transform algebra (`translate`/`scale`/`rotate`/`skew`/`mirror`)
//!   folded into a single matrix via a `TransformChain`.
//!
//! Unlike a general purpose geometry crate, there is deliberately no
//! `euclid` dependency here: 2D transforms use one row-major `M3`
//! representation exclusively, so there is only ever one way to ask "what
//! matrix does this chain fold to".

mod scalar;
mod vector;
mod matrix;
mod angle;
mod unit;
mod transform;

pub use crate::scalar::F;
pub use crate::vector::{V2, V3, V4};
pub use crate::matrix::{M3, M4};
pub use crate::angle::{Deg, Rad};
pub use crate::unit::{convert, parse_number_unit, Unit, UnitParseError};
pub use crate::transform::{
    Transform, TransformChain, TransformParseError, parse_transform_list,
};

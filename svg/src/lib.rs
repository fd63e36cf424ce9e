#![doc(html_logo_url = "https://nical.github.io/lyon-doc/lyon-logo.svg")]

//! The input document model: an `Element` tree decoded from SVG markup,
//! and a walker that turns it into a flat stream of `(transform chain,
//! leaf shape)` pairs ready for the path evaluator.

pub use svgplot_geom::F;

mod element;
mod walker;
mod xml;

pub use crate::element::{Element, Header};
pub use crate::walker::{walk, WalkError};
pub use crate::xml::{decode, XmlError};

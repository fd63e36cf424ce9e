#![doc(html_logo_url = "https://nical.github.io/lyon-doc/lyon-logo.svg")]

//! Low-level motion instruction emission: the path evaluator that walks a
//! command stream into drawing/travel moves, the motion builder that
//! composes the actual G-code text, and the `Segment`/`Program` model the
//! rest of the pipeline orders and assembles.

mod builder;
mod evaluator;
mod segment;

pub use crate::builder::{Mode, MotionBuilder};
pub use crate::evaluator::{evaluate_circle, evaluate_commands, evaluate_ellipse, EvalError};
pub use crate::segment::{Program, Segment};

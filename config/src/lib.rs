#![doc(html_logo_url = "https://nical.github.io/lyon-doc/lyon-logo.svg")]

//! Plotter profile loading (YAML, defaulted from a built-in compiled-in
//! profile) and the runtime configuration derived from it for the path
//! evaluator.

mod default_profile;
mod plotter;
mod runtime;

pub use crate::default_profile::lk5_pro;
pub use crate::plotter::{load, to_yaml, ConfigError, PlotterConfig};
pub use crate::runtime::RuntimeConfig;

use svgplot_geom::{Unit, F};

use crate::plotter::PlotterConfig;

/// The slice of configuration the path evaluator actually consumes,
/// derived from a [`PlotterConfig`] plus the unit the input document's own
/// coordinates are expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeConfig {
    pub plotter_unit: Unit,
    pub svg_unit: Unit,
    pub draw_height: F,
    pub retract_height: F,
    pub draw_speed: F,
    pub retract_speed: F,
}

impl RuntimeConfig {
    pub fn from_plotter(profile: &PlotterConfig, svg_unit: Unit) -> RuntimeConfig {
        RuntimeConfig {
            plotter_unit: profile.length_unit,
            svg_unit,
            draw_height: profile.drawing_height,
            retract_height: profile.retract_height,
            draw_speed: profile.draw_speed,
            retract_speed: profile.retract_speed,
        }
    }
}

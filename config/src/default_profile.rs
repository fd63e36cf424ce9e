use svgplot_geom::{Unit, V2, V3};

use crate::plotter::PlotterConfig;

/// The compiled-in profile for the LK5 Pro, used whenever no
/// `--plotter-config` file is supplied, and as the defaulting source for
/// any key a supplied file omits.
pub fn lk5_pro() -> PlotterConfig {
    PlotterConfig {
        gprefix: "G28\nG21\nG90\n".to_string(),
        gsuffix: "G28 X0 Y0\nM84\n".to_string(),
        length_unit: Unit::Mm,
        plate_center: V2::new(110.0, 110.0),
        plate_min: V3::new(0.0, 0.0, 0.0),
        plate_max: V3::new(220.0, 220.0, 30.0),
        drawing_height: 0.0,
        retract_height: 5.0,
        draw_speed: 1500.0,
        retract_speed: 3000.0,
        remove_comments: false,
        mirror_x_axis: false,
        mirror_y_axis: true,
        pen_offset: V2::new(0.0, 0.0),
    }
}

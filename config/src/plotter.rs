use serde::{Deserialize, Serialize};

use svgplot_geom::{Unit, F, V2, V3};

use crate::default_profile::lk5_pro;

/// A fully-resolved plotter profile: every field defaulted, no optionality
/// left over from the YAML source.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotterConfig {
    pub gprefix: String,
    pub gsuffix: String,
    pub length_unit: Unit,
    pub plate_center: V2,
    pub plate_min: V3,
    pub plate_max: V3,
    pub drawing_height: F,
    pub retract_height: F,
    pub draw_speed: F,
    pub retract_speed: F,
    pub remove_comments: bool,
    pub mirror_x_axis: bool,
    pub mirror_y_axis: bool,
    pub pen_offset: V2,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("malformed plotter profile YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("'{0}' is not a recognised length-unit for a plotter profile (expected 'mm' or 'in')")]
    UnknownLengthUnit(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Plate {
    center: Option<[F; 2]>,
    min: Option<[F; 3]>,
    max: Option<[F; 3]>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PlotterConfigFile {
    gprefix: Option<String>,
    gsuffix: Option<String>,
    length_unit: Option<String>,
    plate: Option<Plate>,
    drawing_height: Option<F>,
    retract_height: Option<F>,
    draw_speed: Option<F>,
    retract_speed: Option<F>,
    remove_comments: Option<bool>,
    mirror_x_axis: Option<bool>,
    mirror_y_axis: Option<bool>,
    pen_offset: Option<[F; 2]>,
}

fn parse_length_unit(s: &str) -> Result<Unit, ConfigError> {
    match s {
        "mm" => Ok(Unit::Mm),
        "in" => Ok(Unit::In),
        other => Err(ConfigError::UnknownLengthUnit(other.to_string())),
    }
}

/// Deserializes a plotter profile from YAML text. Every key is optional;
/// an absent key falls back to the built-in LK5 Pro profile, so a
/// configuration file may override only the keys that differ from it.
pub fn load(yaml_text: &str) -> Result<PlotterConfig, ConfigError> {
    let file: PlotterConfigFile = serde_yaml::from_str(yaml_text)?;
    let default = lk5_pro();
    let plate = file.plate.unwrap_or_default();
    let length_unit = match file.length_unit {
        Some(s) => parse_length_unit(&s)?,
        None => default.length_unit,
    };
    Ok(PlotterConfig {
        gprefix: file.gprefix.unwrap_or(default.gprefix),
        gsuffix: file.gsuffix.unwrap_or(default.gsuffix),
        length_unit,
        plate_center: plate.center.map(|[x, y]| V2::new(x, y)).unwrap_or(default.plate_center),
        plate_min: plate.min.map(|[x, y, z]| V3::new(x, y, z)).unwrap_or(default.plate_min),
        plate_max: plate.max.map(|[x, y, z]| V3::new(x, y, z)).unwrap_or(default.plate_max),
        drawing_height: file.drawing_height.unwrap_or(default.drawing_height),
        retract_height: file.retract_height.unwrap_or(default.retract_height),
        draw_speed: file.draw_speed.unwrap_or(default.draw_speed),
        retract_speed: file.retract_speed.unwrap_or(default.retract_speed),
        remove_comments: file.remove_comments.unwrap_or(default.remove_comments),
        mirror_x_axis: file.mirror_x_axis.unwrap_or(default.mirror_x_axis),
        mirror_y_axis: file.mirror_y_axis.unwrap_or(default.mirror_y_axis),
        pen_offset: file.pen_offset.map(|[x, y]| V2::new(x, y)).unwrap_or(default.pen_offset),
    })
}

/// Serializes a fully-resolved profile back to the same YAML shape
/// [`load`] accepts, with every key present. Used by
/// `--plotter-config-template`.
pub fn to_yaml(profile: &PlotterConfig) -> Result<String, ConfigError> {
    let file = PlotterConfigFile {
        gprefix: Some(profile.gprefix.clone()),
        gsuffix: Some(profile.gsuffix.clone()),
        length_unit: Some(profile.length_unit.name().to_string()),
        plate: Some(Plate {
            center: Some([profile.plate_center.x, profile.plate_center.y]),
            min: Some([profile.plate_min.x, profile.plate_min.y, profile.plate_min.z]),
            max: Some([profile.plate_max.x, profile.plate_max.y, profile.plate_max.z]),
        }),
        drawing_height: Some(profile.drawing_height),
        retract_height: Some(profile.retract_height),
        draw_speed: Some(profile.draw_speed),
        retract_speed: Some(profile.retract_speed),
        remove_comments: Some(profile.remove_comments),
        mirror_x_axis: Some(profile.mirror_x_axis),
        mirror_y_axis: Some(profile.mirror_y_axis),
        pen_offset: Some([profile.pen_offset.x, profile.pen_offset.y]),
    };
    Ok(serde_yaml::to_string(&file)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let profile = load("drawing-height: 1.5\n").unwrap();
        let default = lk5_pro();
        assert_eq!(profile.drawing_height, 1.5);
        assert_eq!(profile.retract_height, default.retract_height);
        assert_eq!(profile.plate_max, default.plate_max);
    }

    #[test]
    fn unknown_length_unit_is_fatal() {
        assert!(matches!(load("length-unit: furlong\n"), Err(ConfigError::UnknownLengthUnit(_))));
    }

    #[test]
    fn template_round_trips_to_equal_default() {
        let default = lk5_pro();
        let yaml = to_yaml(&default).unwrap();
        let reparsed = load(&yaml).unwrap();
        assert_eq!(reparsed, default);
    }

    #[test]
    fn malformed_yaml_is_fatal() {
        assert!(matches!(load("not: [valid"), Err(ConfigError::Yaml(_))));
    }
}

/// The scalar type used throughout svgplot: IEEE 754 binary64.
pub type F = f64;

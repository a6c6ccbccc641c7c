// Domain layer: grade/course models and ports. No network or file access here.

pub mod model;
pub mod ports;

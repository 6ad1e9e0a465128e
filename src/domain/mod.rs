// Domain layer: models, lookup tables, content and ports. No I/O here.

pub mod content;
pub mod model;
pub mod ports;
pub mod tables;

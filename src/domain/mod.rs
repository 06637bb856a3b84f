// Domain layer: document tree, answer data and ports (interfaces).

pub mod model;
pub mod ports;

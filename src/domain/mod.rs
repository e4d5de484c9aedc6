// Domain layer: rules, issues, decisions and the tracker port.

pub mod model;
pub mod ports;
pub mod rule;

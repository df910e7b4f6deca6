// Domain layer: portal models and ports (interfaces) the client depends on.

pub mod model;
pub mod ports;

// Domain layer: models shared across the adapter and the ports (traits)
// implemented by external collaborators.

pub mod model;
pub mod ports;

// Domain layer: transaction contracts, field schemas and ports.

pub mod model;
pub mod ports;
pub mod schema;

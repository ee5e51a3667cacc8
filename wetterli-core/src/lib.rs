//! Core types and service wiring for the wetterli forecast aggregator.

/// Weather-code lookup table.
pub mod codes;
/// Stitches resolved locations into fetched forecasts.
pub mod merge;
/// Domain models shared by all backends.
pub mod model;
/// Bundle of ports that make up one weather backend.
pub mod plugin;
/// Traits describing the backend interfaces and the error taxonomy.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use codes::*;
pub use merge::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;

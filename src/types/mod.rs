pub mod coordinate;
pub mod measurement;
pub mod telemetry;

pub use telemetry::{Camera, FlightMode, TelemetrySample};

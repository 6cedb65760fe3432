#[macro_use]
extern crate log;
extern crate nalgebra;
#[macro_use]
extern crate serde;

pub mod components;
pub mod config;
pub mod hal;
pub mod osd;
pub mod telemetry;
pub mod types;

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

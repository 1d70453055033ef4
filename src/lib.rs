//! Japanese arithmetic practice: procedural question generation for grades
//! 小4 through 中3, free-text answer normalization, and a small quiz service
//! around them.

pub mod telemetry;
pub mod config;
pub mod error;
pub mod domain;
pub mod catalog;
pub mod util;
pub mod numeric;
pub mod figure;
pub mod generator;
pub mod normalizer;
pub mod quiz;
pub mod state;
pub mod logic;
pub mod protocol;
pub mod routes;

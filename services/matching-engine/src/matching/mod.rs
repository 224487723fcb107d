//! Matching logic
//!
//! Crossing detection and the price-time priority matching loop.

pub mod crossing;
pub mod engine;

pub use engine::{Fill, MatchingEngine};

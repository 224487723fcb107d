//! Trading coordinator service
//!
//! Top-level orchestration of the exchange core. A submit runs
//! reserve → persist → match → settle → emit; a cancel reverses the
//! reservation and removes the resting entry. The coordinator is the
//! only writer that updates the order store and the order book in
//! lockstep.

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod settlement;
pub mod sink;

pub use config::ExchangeConfig;
pub use coordinator::{OrderRequest, TradingCoordinator};
pub use sink::{EventSink, LoggingEventSink, PublishedEvent, RecordingEventSink, SinkError};

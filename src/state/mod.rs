//! Engine state machines (pure).
//!
//! All state transitions are pure functions testable without a terminal or
//! a runtime; async work leaves as commands.

pub mod engine;
pub mod pagination;

// Re-export for convenience
pub use engine::{Command, Engine, EngineConfig, EngineEvent, EngineStats};
pub use pagination::{
    transition, Effect, FetchOrigin, FetchRequest, FlightFlags, PaginationConfig,
    PaginationController, PaginationEvent, PaginationState,
};

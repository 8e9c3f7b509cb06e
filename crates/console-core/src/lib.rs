//! Core engine for the order console.
//!
//! This crate ties the components together: it expands carts into
//! records, owns the submission workflow state machine, and provides
//! the `ConsoleEngine` that coordinates the row store, selection, view
//! pipeline and backend client behind a single event-driven entry
//! point. All state lives on the engine's event-loop task; the only
//! suspension point is the one network call per submission, which runs
//! as a spawned task so editing stays responsive.

/// Cart expansion into order records.
pub mod cart;
/// Event bus for change notifications to the presentation layer.
pub mod event_bus;
/// The engine coordinating all components.
pub mod engine;
/// Submission workflow state machine.
pub mod workflow;

pub use cart::{expand_cart, CartError};
pub use engine::{ConsoleAction, ConsoleEngine, EngineError, SubmissionOutcome};
pub use event_bus::EventBus;
pub use workflow::{Resolution, SubmissionTicket, SubmissionWorkflow, WorkflowError};

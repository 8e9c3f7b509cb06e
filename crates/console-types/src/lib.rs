//! Common types module for the order console.
//!
//! This crate defines the core data types shared across the console
//! components. It provides a centralized location for the record model,
//! submission lifecycle types, wire structures, and change events to
//! ensure consistency across all crates.

/// Wire types for the backend job service contract.
pub mod api;
/// Cart and catalog types feeding the cart expander.
pub mod cart;
/// Credential capture types for submission confirmation.
pub mod credentials;
/// Change events published to the presentation layer.
pub mod events;
/// Order record model and column addressing.
pub mod order;
/// Secret string wrapper for sensitive credential data.
pub mod secret;
/// Submission lifecycle and notification types.
pub mod submission;

// Re-export all types for convenient access
pub use api::*;
pub use cart::*;
pub use credentials::*;
pub use events::*;
pub use order::*;
pub use secret::Secret;
pub use submission::*;

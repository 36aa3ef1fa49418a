//! Gateway event handlers.
//!
//! Events are translated into the core's types here and handed to the
//! dispatcher, the chat responder and the member join handler.

/// Event routing for the poise framework
pub mod events;

pub use events::event_handler;

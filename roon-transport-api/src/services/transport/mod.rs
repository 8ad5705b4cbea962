//! The `com.roonlabs.transport:2` service
//!
//! Request operations live in [`operations`], subscription payloads in
//! [`events`].

pub mod events;
pub mod operations;

pub use events::*;
pub use operations::*;

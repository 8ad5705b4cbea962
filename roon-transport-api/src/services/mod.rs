//! Service definitions
//!
//! Each service module groups its request operations and its subscription
//! payload types.

pub mod transport;

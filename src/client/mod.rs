//! # Client Role (Device B)
//!
//! Device B initiates the connection to device A and keeps trying while A
//! is not yet listening:
//!
//! - Connection refused is the one retried condition: wait a fixed two
//!   seconds, try again, forever. No backoff growth, no attempt cap.
//! - Ctrl-C while waiting cancels cleanly with a success exit.
//! - Any other connect failure is fatal.
//!
//! Once connected, the client runs the same duplex session as the server.

pub mod client;

pub use client::{connect_with_retry, run};

//! Typed client for the newsroom gateway.

mod client;

pub use client::*;

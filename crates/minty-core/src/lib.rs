//! Core types and services for the Minty Labs site backend.
//!
//! This crate is deliberately free of HTTP and transport dependencies. The
//! API, server and CLI crates depend on it; notification transports plug in
//! through [`notify::NotificationSink`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod carousel;
pub mod content;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod form;
pub mod intake;
pub mod lead;
pub mod notify;

pub use error::{Error, Result};

//! HTTP plumbing for provider adapters.
//!
//! - [`HttpTransport`]: one-shot GET, swappable for tests
//! - [`ResilientClient`]: rate limiting, retry and backoff on top of a transport

mod client;
mod transport;

pub use client::{ResilientClient, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

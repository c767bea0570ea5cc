/// Classification for retry policy.
///
/// Used by the resilient HTTP client to decide whether another attempt is
/// worthwhile, and by the registry to decide whether to move on.
///
/// # Behavior Summary
///
/// | Class | Retry same provider? | Try next provider? |
/// |-------|----------------------|--------------------|
/// | `Never` | No | No |
/// | `WithBackoff` | Yes, after `base * 2^attempt` | Yes, once attempts run out |
/// | `NextProvider` | No | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - the request itself is invalid (unknown asset symbol).
    /// No provider can answer it, so the caller gets the error back.
    Never,

    /// Transient failure (network, timeout, HTTP error status, 429).
    ///
    /// The HTTP client sleeps and tries again until its attempt ceiling is
    /// reached. Rate-limit responses honor the provider's `Retry-After`
    /// hint instead of the computed backoff.
    WithBackoff,

    /// This provider can't answer (unmapped symbol, unsupported interval,
    /// malformed or empty payload, exhausted retries) but another one might.
    NextProvider,
}

//! # Mock Resolver & Testing Guide
//!
//! [`MockResolver`] implements [`RelationshipResolver`] entirely in memory. Queue
//! the URLs you expect the converter to fetch, with the bytes (or the failure)
//! each call should produce, then check that everything was consumed.
//!
//! ## When to use the mock vs a real resolver
//!
//! | Feature | MockResolver | Real resolver |
//! |---------|--------------|---------------|
//! | **Speed** | Instant (in-memory) | Network bound |
//! | **Determinism** | Fully deterministic | Depends on the remote side |
//! | **Order checks** | Calls must match the queued URLs | None |
//! | **Error injection** | Easy (`return_err`) | Hard |
//!
//! ## Example
//!
//! ```rust
//! use jsonapi_converter::mock::MockResolver;
//! use jsonapi_converter::RelationshipResolver;
//!
//! let mock = MockResolver::new();
//! mock.expect_resolve("http://api.test/users/1")
//!     .return_ok(br#"{"data": {"type": "users", "id": "1"}}"#.to_vec());
//! mock.expect_resolve("http://api.test/users/2")
//!     .return_err("connection reset");
//!
//! assert!(mock.resolve("http://api.test/users/1").is_ok());
//! assert!(mock.resolve("http://api.test/users/2").is_err());
//!
//! mock.verify(); // panics if an expectation was never consumed
//! assert_eq!(mock.calls().len(), 2);
//! ```
//!
//! Clones share their queue, so keep one clone for `verify()` and hand the
//! other to the converter builder.

use crate::error::BoxError;
use crate::resolver::RelationshipResolver;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Failures reported by [`MockResolver`] to the converter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    #[error("Unexpected resolve call for `{0}`")]
    Unexpected(String),

    #[error("Expected resolve of `{expected}`, got `{actual}`")]
    Mismatch { expected: String, actual: String },

    #[error("{0}")]
    Injected(String),
}

#[derive(Debug)]
struct Expectation {
    url: String,
    response: Result<Vec<u8>, String>,
}

#[derive(Debug, Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<String>,
}

/// Resolver test double driven by an ordered list of expectations.
#[derive(Debug, Clone, Default)]
pub struct MockResolver {
    state: Arc<Mutex<MockState>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an expected call for `url`.
    pub fn expect_resolve(&self, url: impl Into<String>) -> ResolveExpectationBuilder {
        ResolveExpectationBuilder {
            url: url.into(),
            state: Arc::clone(&self.state),
        }
    }

    /// URLs requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.expectations.is_empty() {
            let remaining: Vec<&str> = state
                .expectations
                .iter()
                .map(|expectation| expectation.url.as_str())
                .collect();
            panic!(
                "Not all expectations were met. {} remaining: {remaining:?}",
                remaining.len()
            );
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the queue from `verify`.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RelationshipResolver for MockResolver {
    fn resolve(&self, url: &str) -> Result<Vec<u8>, BoxError> {
        let mut state = self.lock();
        state.calls.push(url.to_string());

        let Some(expectation) = state.expectations.pop_front() else {
            return Err(MockError::Unexpected(url.to_string()).into());
        };
        if expectation.url != url {
            return Err(MockError::Mismatch {
                expected: expectation.url,
                actual: url.to_string(),
            }
            .into());
        }
        expectation
            .response
            .map_err(|message| MockError::Injected(message).into())
    }
}

/// Builder for one `resolve` expectation.
pub struct ResolveExpectationBuilder {
    url: String,
    state: Arc<Mutex<MockState>>,
}

impl ResolveExpectationBuilder {
    /// The call returns `body` as the fetched document.
    pub fn return_ok(self, body: impl Into<Vec<u8>>) {
        self.push(Ok(body.into()));
    }

    /// The call fails with `message`.
    pub fn return_err(self, message: impl Into<String>) {
        self.push(Err(message.into()));
    }

    fn push(self, response: Result<Vec<u8>, String>) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.expectations.push_back(Expectation {
            url: self.url,
            response,
        });
    }
}

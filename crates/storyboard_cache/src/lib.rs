//! In-flight request de-duplication.
//!
//! Identical expensive requests issued while one is already pending share
//! that pending request instead of starting another. Entries only live while
//! their request is in flight, so this is coalescing, not memoization.

#![warn(missing_docs)]

mod cache;

pub use cache::{RequestCache, normalize_key};

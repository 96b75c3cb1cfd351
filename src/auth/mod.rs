//! Token acquisition for the Power BI REST API.
//!
//! One bearer token covers the whole batch: it is obtained (or reused
//! from the credential file) once, before any export task starts, and
//! shared read-only by every task.

pub mod token;

pub use token::{CachedToken, Clock, SystemClock, TokenProvider};

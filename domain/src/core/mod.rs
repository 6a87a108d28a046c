//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: UTF-8 safe truncation helpers
//! - [`time`]: millisecond timestamps

pub mod error;
pub mod string;
pub mod time;

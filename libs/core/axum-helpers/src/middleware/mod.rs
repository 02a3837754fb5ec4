//! Front-door middleware applied before any route logic.

pub mod security;

pub use security::{HSTS_VALUE, security_headers, trailing_slash_redirect};

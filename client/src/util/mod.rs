//! Browser and routing helpers shared by pages and components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything touching `window` lives here behind the `csr` feature, so the
//! pages above stay testable on the host.

pub mod auth;
pub mod browser;
pub mod storage;

//! Networking modules for the hosted auth/data service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `hosted` implements the `session` crate's backend seam over REST, and
//! `types` defines the service's wire schema.

pub mod hosted;
pub mod types;

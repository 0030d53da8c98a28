//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the shared `AuthContext` from Leptos context rather than
//! taking session state as props.

pub mod status_indicator;

//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates session work to
//! the controller behind `state::auth::AuthContext`.

pub mod auth_callback;
pub mod home;
pub mod login;

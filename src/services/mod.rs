//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own storage concerns so route handlers can stay focused on
//! request validation and status mapping.

pub mod levels;

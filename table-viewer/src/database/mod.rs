//! Database access
//!
//! The provider trait is the seam between the HTTP layer and PostgreSQL; the
//! gateway turns provider results into what the page displays.

pub mod gateway;
pub mod postgres;
pub mod traits;

// Re-export the main trait
pub use traits::DatabaseProvider;

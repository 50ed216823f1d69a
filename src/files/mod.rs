//! Static file serving.
//!
//! - **`handler`**: maps requests onto the root directory
//! - **`overrides`**: per-directory `.goshs` sentinel resolution
//! - **`listing`**: HTML directory listings
//! - **`mime`**: Content-Type by file extension

pub mod handler;
pub mod listing;
pub mod mime;
pub mod overrides;

pub use handler::FileHandler;
pub use overrides::{resolve, OverrideConfig, ResolveError};

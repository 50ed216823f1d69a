//! goshs - a static file server with request introspection
//!
//! Serves a directory tree over HTTP, honours per-directory `.goshs`
//! override files and, in verbose mode, dumps headers, query values and
//! POST bodies of every request.

pub mod config;
pub mod files;
pub mod http;
pub mod inspect;
pub mod logging;
pub mod privilege;
pub mod server;

//! Traffic introspection.
//!
//! Every exchange gets a status line whose level depends on the status
//! bucket. Verbose mode adds a header dump, pretty-printed query values and
//! a decoded view of POST bodies. Decoding problems only ever produce
//! warnings.

pub mod body;
pub mod headers;
pub mod logger;
pub mod query;
pub mod status;

pub use logger::{Exchange, RequestLogger};
pub use status::Bucket;

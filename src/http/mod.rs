//! HTTP protocol implementation.
//!
//! This module implements a small HTTP/1.1 server with support for keep-alive connections.
//!
//! # Architecture
//!
//! - **`connection`**: The main connection handler implementing the request-response state machine
//! - **`parser`**: Parses incoming HTTP requests from byte buffers
//! - **`request`**: HTTP request representation and query decoding
//! - **`response`**: HTTP response representation with builder pattern
//! - **`urlencoded`**: Strict percent-decoding for paths and form bodies
//! - **`writer`**: Serializes and writes HTTP responses to the client
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for incoming request data
//!        └──────┬──────┘
//!               │ Request received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Serve the file, then log the exchange
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → Closed
//! ```
//!
//! Request bodies are buffered in full before processing. There is no
//! size limit on them.

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod urlencoded;
pub mod writer;

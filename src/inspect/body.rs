//! POST body introspection.
//!
//! The whole body is read into memory before it is classified. There is
//! no size limit: a large POST costs as much memory as it is long.

use std::io::{self, Read, Write};

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::http::request::Method;
use crate::http::urlencoded::parse_form;

/// Upload endpoint whose bodies are never dumped.
pub const UPLOAD_PATH: &str = "/upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    Unrecognized,
}

impl BodyKind {
    /// Substring match on the Content-Type, JSON first.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.contains("application/json") {
            BodyKind::Json
        } else if content_type.contains("application/x-www-form-urlencoded") {
            BodyKind::Form
        } else {
            BodyKind::Unrecognized
        }
    }
}

/// Whether a request's body gets introspected at all.
pub fn should_inspect(method: Method, path: &str, verbose: bool) -> bool {
    verbose && method == Method::POST && path != UPLOAD_PATH
}

/// Drains `source` and prints its content to `out` according to the
/// content type.
///
/// Decoding failures are logged as warnings and fall back to the raw
/// bytes. A read failure is logged and nothing is printed. `source` is
/// consumed and dropped on every path.
pub fn introspect_body<R: Read, W: Write>(
    source: R,
    content_type: &str,
    out: &mut W,
) -> io::Result<()> {
    let bytes = match drain(source) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("error reading request body: {}", err);
            return Ok(());
        }
    };

    match BodyKind::from_content_type(content_type) {
        BodyKind::Json => {
            info!("POST Body is JSON");
            match pretty_object(&bytes) {
                Ok(pretty) => writeln!(out, "{}", pretty),
                Err(err) => {
                    warn!("error unmarshalling JSON body: {}", err);
                    write_raw(&bytes, out)
                }
            }
        }
        BodyKind::Form => {
            info!("POST Body is form-urlencoded");
            match parse_form(&bytes) {
                Ok(fields) => {
                    for (key, values) in fields {
                        writeln!(out, "{}: {}", key, values.join(","))?;
                    }
                    Ok(())
                }
                Err(err) => {
                    warn!("error parsing form-urlencoded body: {}", err);
                    write_raw(&bytes, out)
                }
            }
        }
        BodyKind::Unrecognized => {
            info!("POST Body has unrecognized Content-Type: {}", content_type);
            write_raw(&bytes, out)
        }
    }
}

fn drain<R: Read>(mut source: R) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn pretty_object(bytes: &[u8]) -> serde_json::Result<String> {
    let object: Map<String, Value> = serde_json::from_slice(bytes)?;
    serde_json::to_string_pretty(&object)
}

fn write_raw<W: Write>(bytes: &[u8], out: &mut W) -> io::Result<()> {
    out.write_all(bytes)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))
        }
    }

    #[test]
    fn read_failure_prints_nothing() {
        let mut out = Vec::new();

        introspect_body(FailingReader, "application/json", &mut out).unwrap();

        assert!(out.is_empty());
    }

    #[test]
    fn json_wins_over_form_in_content_type() {
        assert_eq!(
            BodyKind::from_content_type("application/json; x=application/x-www-form-urlencoded"),
            BodyKind::Json
        );
        assert_eq!(
            BodyKind::from_content_type("application/x-www-form-urlencoded; charset=utf-8"),
            BodyKind::Form
        );
        assert_eq!(BodyKind::from_content_type(""), BodyKind::Unrecognized);
    }
}

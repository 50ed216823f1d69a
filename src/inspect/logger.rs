use std::io::Write;
use std::net::SocketAddr;

use bytes::Buf;
use tracing::{error, info, warn};

use crate::http::request::Request;
use crate::inspect::body::{introspect_body, should_inspect};
use crate::inspect::headers::dump_headers;
use crate::inspect::query::inspect_query;
use crate::inspect::status::Bucket;

/// One request/response pair as seen by the logger.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub remote_addr: SocketAddr,
    pub request: &'a Request,
    pub status: u16,
}

impl Exchange<'_> {
    pub fn bucket(&self) -> Bucket {
        Bucket::classify(self.status)
    }

    /// `<remote> - [<status>] - "<method> <target> <proto>"`
    pub fn status_line(&self, colored: bool) -> String {
        let status = if colored {
            format!("{}{}\x1b[0m", self.bucket().color(), self.status)
        } else {
            self.status.to_string()
        };
        format!(
            "{} - [{}] - \"{} {} {}\"",
            self.remote_addr,
            status,
            self.request.method,
            self.request.path,
            self.request.version,
        )
    }
}

/// Logs every exchange and, in verbose mode, dumps headers, query values
/// and POST bodies.
///
/// Nothing here can fail the request: write errors on the output sink are
/// logged and dropped.
#[derive(Debug, Clone)]
pub struct RequestLogger {
    verbose: bool,
    colored: bool,
}

impl RequestLogger {
    pub fn new(verbose: bool) -> Self {
        Self { verbose, colored: true }
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Logs `exchange`, printing decoded payloads to `out`.
    ///
    /// The body is read from a clone of the buffered bytes, so the request
    /// itself stays readable for whoever holds it.
    pub fn log<W: Write>(&self, exchange: &Exchange<'_>, out: &mut W) {
        let line = exchange.status_line(self.colored);
        match exchange.bucket() {
            Bucket::Error => error!("{}", line),
            _ => info!("{}", line),
        }

        let request = exchange.request;
        if self.verbose {
            dump_headers(&request.headers);
        }

        if let Err(err) = inspect_query(&request.query_params(), self.verbose, out) {
            warn!("failed to print query parameters: {}", err);
        }

        if should_inspect(request.method, request.uri_path(), self.verbose) {
            let source = request.body.clone().reader();
            if let Err(err) = introspect_body(source, request.content_type(), out) {
                warn!("failed to print request body: {}", err);
            }
        }
    }
}

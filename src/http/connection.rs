use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::files::FileHandler;
use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::inspect::{Exchange, RequestLogger};

/// What a connection needs to answer requests.
#[derive(Debug)]
pub struct Services {
    pub files: FileHandler,
    pub logger: RequestLogger,
}

pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: Vec<u8>,
    state: ConnectionState,
    services: Arc<Services>,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, services: Arc<Services>) -> Self {
        Self {
            stream,
            peer,
            buffer: Vec::with_capacity(4096),
            state: ConnectionState::Reading,
            services,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    match self.read_request().await {
                        Ok(Some(req)) => {
                            self.state = ConnectionState::Processing(req);
                        }
                        Ok(None) => {
                            self.state = ConnectionState::Closed;
                        }
                        Err(ReadError::Malformed(e)) => {
                            tracing::debug!("rejecting request from {}: {}", self.peer, e);
                            let response = ResponseBuilder::new(StatusCode::BadRequest)
                                .header("Connection", "close")
                                .body(b"400 Bad Request".to_vec())
                                .build();
                            self.state = ConnectionState::Writing(ResponseWriter::new(&response), false);
                        }
                        Err(ReadError::Io(e)) => return Err(e.into()),
                    }
                }

                ConnectionState::Processing(req) => {
                    let (response, keep_alive) = Self::handle_request(&self.services, self.peer, req);

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_request(&mut self) -> Result<Option<Request>, ReadError> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.drain(..consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Err(ReadError::Malformed(e)),
            }

            let mut temp = [0u8; 4096];
            let n = self.stream.read(&mut temp).await.map_err(ReadError::Io)?;

            if n == 0 {
                // Client closed connection
                return Ok(None);
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }

    /// Serves the request, then logs it. The logger reads its own copy of
    /// the body, so the handler is never short of it.
    fn handle_request(services: &Services, peer: SocketAddr, req: &Request) -> (Response, bool) {
        let response = services.files.handle(req);
        let keep_alive = req.keep_alive();

        let exchange = Exchange {
            remote_addr: peer,
            request: req,
            status: response.status.as_u16(),
        };
        services.logger.log(&exchange, &mut std::io::stdout().lock());

        (response, keep_alive)
    }
}

enum ReadError {
    Malformed(ParseError),
    Io(std::io::Error),
}

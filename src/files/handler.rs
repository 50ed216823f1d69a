use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::config::FilesConfig;
use crate::files::listing;
use crate::files::mime::content_type_for;
use crate::files::overrides::{resolve, EffectiveConfig, OverrideConfig, ResolveError, SENTINEL};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::urlencoded::percent_decode;
use crate::inspect::body::UPLOAD_PATH;

/// Serves files below a root directory.
///
/// All filesystem access is blocking and happens inline. Every directory
/// access re-reads that directory's sentinel file.
#[derive(Debug, Clone)]
pub struct FileHandler {
    config: FilesConfig,
}

impl FileHandler {
    pub fn new(config: FilesConfig) -> Self {
        Self { config }
    }

    pub fn handle(&self, request: &Request) -> Response {
        match request.method {
            Method::GET => self.serve(request),
            Method::HEAD => self.serve(request).without_body(),
            Method::PUT => self.put(request),
            Method::POST if request.uri_path() == UPLOAD_PATH => self.upload(request),
            _ => Response::method_not_allowed(),
        }
    }

    fn serve(&self, request: &Request) -> Response {
        let uri_path = request.uri_path();
        let Some(path) = self.locate(uri_path) else {
            return Response::not_found();
        };
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) => return io_response(&path, &err),
        };

        if metadata.is_dir() {
            if !uri_path.ends_with('/') {
                let location = match request.query() {
                    Some(query) => format!("{}/?{}", uri_path, query),
                    None => format!("{}/", uri_path),
                };
                return Response::redirect(StatusCode::MovedPermanently, location);
            }
            let effective = match self.effective(&path) {
                Ok(effective) => effective,
                Err(response) => return response,
            };
            if let Some(response) = check_access(&effective, request) {
                return response;
            }
            if !effective.listing {
                return Response::not_found();
            }
            return match listing::read_entries(&path) {
                Ok(entries) => ResponseBuilder::new(StatusCode::Ok)
                    .header("Content-Type", "text/html; charset=utf-8")
                    .body(listing::render(uri_path, &entries).into_bytes())
                    .build(),
                Err(err) => io_response(&path, &err),
            };
        }

        if is_sentinel(&path) {
            return Response::not_found();
        }
        let Some(dir) = path.parent() else {
            return Response::not_found();
        };
        let effective = match self.effective(dir) {
            Ok(effective) => effective,
            Err(response) => return response,
        };
        if let Some(response) = check_access(&effective, request) {
            return response;
        }

        match fs::read(&path) {
            Ok(content) => ResponseBuilder::new(StatusCode::Ok)
                .header("Content-Type", content_type_for(&path))
                .body(content)
                .build(),
            Err(err) => io_response(&path, &err),
        }
    }

    fn put(&self, request: &Request) -> Response {
        let uri_path = request.uri_path();
        if uri_path.ends_with('/') {
            return ResponseBuilder::new(StatusCode::BadRequest)
                .body(b"400 Bad Request: no file name".to_vec())
                .build();
        }
        let Some(path) = self.locate(uri_path) else {
            return Response::not_found();
        };
        if is_sentinel(&path) {
            return Response::not_found();
        }
        let Some(dir) = path.parent() else {
            return Response::not_found();
        };
        match self.store(dir, &path, request) {
            Ok(()) => ResponseBuilder::new(StatusCode::Created)
                .header("Location", uri_path)
                .build(),
            Err(response) => response,
        }
    }

    fn upload(&self, request: &Request) -> Response {
        let name = request
            .query_params()
            .into_iter()
            .find(|(key, _)| key == "name")
            .and_then(|(_, values)| values.into_iter().next());
        let Some(name) = name.filter(|n| is_plain_file_name(n)) else {
            return ResponseBuilder::new(StatusCode::BadRequest)
                .body(b"400 Bad Request: missing or invalid name".to_vec())
                .build();
        };

        let path = self.config.root.join(&name);
        match self.store(&self.config.root, &path, request) {
            Ok(()) => Response::redirect(StatusCode::SeeOther, "/"),
            Err(response) => response,
        }
    }

    /// Writes the request body to `path` if `dir` accepts uploads.
    fn store(&self, dir: &Path, path: &Path, request: &Request) -> Result<(), Response> {
        let effective = self.effective(dir)?;
        if let Some(response) = check_access(&effective, request) {
            return Err(response);
        }
        if !effective.upload {
            return Err(Response::method_not_allowed());
        }
        fs::write(path, &request.body).map_err(|err| io_response(path, &err))?;
        debug!("stored {} bytes at {}", request.body.len(), path.display());
        Ok(())
    }

    /// Serving settings for `dir`. A malformed sentinel is reported and
    /// ignored; an unreadable directory ends the request.
    fn effective(&self, dir: &Path) -> Result<EffectiveConfig, Response> {
        match resolve(dir) {
            Ok(overrides) => Ok(self.config.merge(&overrides)),
            Err(err @ ResolveError::Parse { .. }) => {
                warn!("{}, using defaults", err);
                Ok(self.config.merge(&OverrideConfig::default()))
            }
            Err(ResolveError::Io { path, source }) => Err(io_response(&path, &source)),
        }
    }

    /// Maps a percent-encoded URL path onto the root. Paths that do not
    /// decode or that climb out with `..` map to nothing.
    fn locate(&self, uri_path: &str) -> Option<PathBuf> {
        let decoded = percent_decode(uri_path).ok()?;
        let mut path = self.config.root.clone();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return None,
                s if s.contains(['\\', '\0']) => return None,
                s => path.push(s),
            }
        }
        Some(path)
    }
}

fn check_access(effective: &EffectiveConfig, request: &Request) -> Option<Response> {
    if effective.blocked {
        return Some(Response::not_found());
    }
    match &effective.auth {
        Some(expected) if !credentials_match(request, expected) => Some(Response::unauthorized()),
        _ => None,
    }
}

fn credentials_match(request: &Request, expected: &str) -> bool {
    let Some(encoded) = request
        .header("Authorization")
        .and_then(|value| value.strip_prefix("Basic "))
    else {
        return false;
    };
    match base64::decode(encoded.trim()) {
        Ok(decoded) => decoded == expected.as_bytes(),
        Err(_) => false,
    }
}

fn is_sentinel(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == SENTINEL)
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name != SENTINEL
        && !name.contains(['/', '\\', '\0'])
}

fn io_response(path: &Path, err: &io::Error) -> Response {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            debug!("{}: {}", path.display(), err);
            Response::not_found()
        }
        _ => {
            error!("{}: {}", path.display(), err);
            Response::internal_error()
        }
    }
}

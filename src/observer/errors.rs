//! Application errors reported by handlers.
//!
//! Handlers attach errors to the response they return; the observer reads
//! them back after the chain completes and renders the private ones into
//! the `error` field. The response itself is never changed because of them.

use std::convert::Infallible;
use std::fmt::Write;

use axum::http::Response;
use axum::response::{IntoResponseParts, ResponseParts};

/// Visibility of a reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Internal detail. Included in the access record.
    Private,
    /// Already surfaced to the client. Not repeated in the access record.
    Public,
}

/// A single error reported by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Ordered collection of errors reported while handling one request.
///
/// Returned as part of a response tuple, or attached with
/// [`HandlerErrors::attach`]:
///
/// ```rust,no_run
/// use axum::http::StatusCode;
/// use request_observer::observer::HandlerErrors;
///
/// async fn handler() -> (StatusCode, HandlerErrors, &'static str) {
///     (
///         StatusCode::INTERNAL_SERVER_ERROR,
///         HandlerErrors::private("database unavailable"),
///         "internal error",
///     )
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerErrors {
    errors: Vec<HandlerError>,
}

impl HandlerErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection holding one private error.
    pub fn private(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(ErrorKind::Private, message);
        errors
    }

    /// A collection holding one public error.
    pub fn public(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(ErrorKind::Public, message);
        errors
    }

    pub fn push(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.errors.push(HandlerError {
            kind,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandlerError> {
        self.errors.iter()
    }

    /// Append a private error to the collection stored on `response`.
    pub fn attach<B>(response: &mut Response<B>, error: impl std::fmt::Display) {
        let message = error.to_string();
        match response.extensions_mut().get_mut::<HandlerErrors>() {
            Some(existing) => existing.push(ErrorKind::Private, message),
            None => {
                response.extensions_mut().insert(HandlerErrors::private(message));
            }
        }
    }

    /// Render the private errors, one `Error #NN: message` line each.
    ///
    /// Returns an empty string when no private error was reported.
    pub fn private_description(&self) -> String {
        let mut out = String::new();
        let private = self.errors.iter().filter(|e| e.kind == ErrorKind::Private);
        for (index, error) in private.enumerate() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "Error #{:02}: {}", index + 1, error.message);
        }
        out
    }
}

impl IntoResponseParts for HandlerErrors {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        match res.extensions_mut().get_mut::<HandlerErrors>() {
            Some(existing) => existing.errors.extend(self.errors),
            None => {
                res.extensions_mut().insert(self);
            }
        }
        Ok(res)
    }
}

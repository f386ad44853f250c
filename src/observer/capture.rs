//! Request body duplication and the capture policy.
//!
//! The body is read once into `Bytes`; the handler gets a new `Body` over
//! one clone and the record keeps the other. When the body cannot be held
//! in full, the handler gets the bytes already read followed by whatever
//! is left of the original stream, and nothing is captured.

use axum::body::{Body, Bytes, HttpBody};
use axum::extract::Request;
use axum::http::{header, HeaderMap};
use axum::response::Response;
use futures_util::{future, stream, StreamExt};
use http_body_util::BodyExt;

use crate::config::{BodyLimitTarget, ObserverConfig};

/// Whether the request declares a JSON body.
pub(crate) fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Buffer the request body, returning a request that still carries it.
///
/// Bodies declared larger than `limit` are left untouched. A body that
/// overruns `limit` while streaming, or fails mid-read, is handed on as
/// the bytes read so far followed by the rest of the stream (or the read
/// error); only the capture is given up. Trailers are not forwarded.
pub(crate) async fn buffer_request(request: Request, limit: usize) -> (Request, Option<Bytes>) {
    if declared_length(request.headers()).is_some_and(|len| len > limit as u64) {
        return (request, None);
    }

    let (parts, mut body) = request.into_parts();
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut buffered = 0usize;

    while let Some(frame) = body.frame().await {
        match frame {
            Ok(frame) => {
                let Ok(data) = frame.into_data() else {
                    continue;
                };
                buffered += data.len();
                chunks.push(data);
                if buffered > limit {
                    tracing::debug!(
                        path = %parts.uri.path(),
                        limit,
                        "Request body exceeds capture buffer, forwarding without capture"
                    );
                    let replay =
                        stream::iter(chunks.into_iter().map(Ok)).chain(body.into_data_stream());
                    return (Request::from_parts(parts, Body::from_stream(replay)), None);
                }
            }
            Err(err) => {
                tracing::warn!(
                    path = %parts.uri.path(),
                    error = %err,
                    "Failed to buffer request body for logging"
                );
                let replay = stream::iter(chunks.into_iter().map(Ok))
                    .chain(stream::once(future::ready(Err::<Bytes, _>(err))));
                return (Request::from_parts(parts, Body::from_stream(replay)), None);
            }
        }
    }

    let bytes = join_chunks(chunks);
    (Request::from_parts(parts, Body::from(bytes.clone())), Some(bytes))
}

fn join_chunks(mut chunks: Vec<Bytes>) -> Bytes {
    match chunks.len() {
        0 => Bytes::new(),
        1 => chunks.remove(0),
        _ => Bytes::from(chunks.concat()),
    }
}

/// Size of the response body, or `-1` when it is not known up front.
pub(crate) fn response_size(response: &Response) -> i64 {
    let known = response
        .body()
        .size_hint()
        .exact()
        .or_else(|| declared_length(response.headers()));
    match known {
        Some(len) => i64::try_from(len).unwrap_or(i64::MAX),
        None => -1,
    }
}

/// Text recorded as `requestBody` given the buffered bytes and sizes.
pub(crate) fn captured_body(buffered: Option<&Bytes>, response_size: u64, config: &ObserverConfig) -> String {
    let Some(bytes) = buffered else {
        return String::new();
    };

    let measured = match config.body_limit_target {
        BodyLimitTarget::Response => response_size,
        BodyLimitTarget::Request => bytes.len() as u64,
    };
    if measured > config.body_size_limit {
        return String::new();
    }

    String::from_utf8_lossy(bytes).into_owned()
}

//! The per-request access record.

use std::fmt::Write;
use std::time::Duration;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::TimeFormat;

/// One structured log entry describing a handled request.
///
/// Serialized field names are the ones emitted by every sink:
/// `hostname`, `time`, `statusCode`, `latency`, `clientIP`, `method`,
/// `path`, `rawQuery`, `referer`, `userAgent`, `requestBodySize`,
/// `requestBody`, `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRecord {
    pub hostname: String,
    /// Request start time, rendered with the configured format.
    pub time: String,
    pub status_code: u16,
    #[serde(serialize_with = "serialize_latency")]
    pub latency: Duration,
    #[serde(rename = "clientIP")]
    pub client_ip: String,
    pub method: String,
    pub path: String,
    pub raw_query: String,
    pub referer: String,
    pub user_agent: String,
    /// Response size in bytes; zero when unknown.
    pub request_body_size: u64,
    pub request_body: String,
    pub error: String,
}

impl AccessRecord {
    /// The record as a field-name to value mapping.
    pub fn to_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        }
    }
}

fn serialize_latency<S: Serializer>(latency: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:?}", latency))
}

/// Clamp a possibly negative byte count (unknown size is `-1`) to zero.
pub(crate) fn normalize_size(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or(0)
}

/// Render the request start time.
pub(crate) fn render_start_time(start: DateTime<Local>, format: &TimeFormat, utc: bool) -> String {
    match format {
        TimeFormat::Rfc3339 if utc => start
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        TimeFormat::Rfc3339 => start.to_rfc3339_opts(SecondsFormat::Secs, false),
        TimeFormat::Custom(pattern) => {
            let mut out = String::new();
            let written = if utc {
                write!(out, "{}", start.with_timezone(&Utc).format(pattern))
            } else {
                write!(out, "{}", start.format(pattern))
            };
            if written.is_err() {
                out.clear();
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> AccessRecord {
        AccessRecord {
            hostname: "edge-1".into(),
            time: "2024-05-01T10:00:00Z".into(),
            status_code: 201,
            latency: Duration::from_micros(1500),
            client_ip: "10.0.0.7".into(),
            method: "POST".into(),
            path: "/users".into(),
            raw_query: "dry_run=1".into(),
            referer: String::new(),
            user_agent: "curl/8.0".into(),
            request_body_size: 40,
            request_body: r#"{"name":"a"}"#.into(),
            error: String::new(),
        }
    }

    #[test]
    fn test_field_names() {
        let fields = sample().to_fields();
        let mut names: Vec<&str> = fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "clientIP",
                "error",
                "hostname",
                "latency",
                "method",
                "path",
                "rawQuery",
                "referer",
                "requestBody",
                "requestBodySize",
                "statusCode",
                "time",
                "userAgent",
            ]
        );
    }

    #[test]
    fn test_field_values() {
        let fields = sample().to_fields();
        assert_eq!(fields["statusCode"], 201);
        assert_eq!(fields["requestBodySize"], 40);
        assert_eq!(fields["latency"], "1.5ms");
        assert_eq!(fields["requestBody"], r#"{"name":"a"}"#);
        assert_eq!(fields["clientIP"], "10.0.0.7");
    }

    #[test]
    fn test_normalize_size() {
        assert_eq!(normalize_size(-1), 0);
        assert_eq!(normalize_size(i64::MIN), 0);
        assert_eq!(normalize_size(0), 0);
        assert_eq!(normalize_size(40), 40);
    }

    #[test]
    fn test_render_start_time() {
        let start = Utc
            .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
            .unwrap()
            .with_timezone(&Local);

        assert_eq!(
            render_start_time(start, &TimeFormat::Rfc3339, true),
            "2024-05-01T10:00:00Z"
        );
        assert_eq!(
            render_start_time(start, &TimeFormat::Custom("%Y/%m/%d %H:%M".into()), true),
            "2024/05/01 10:00"
        );
        let local = render_start_time(start, &TimeFormat::Rfc3339, false);
        assert_eq!(DateTime::parse_from_rfc3339(&local).unwrap(), start);
    }

    #[test]
    fn test_invalid_custom_format_renders_empty() {
        let start = Local::now();
        assert_eq!(render_start_time(start, &TimeFormat::Custom("%Q".into()), false), "");
    }
}

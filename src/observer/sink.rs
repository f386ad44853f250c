//! Destinations for access records.

use std::sync::Mutex;

use crate::observer::record::AccessRecord;

/// `tracing` target used by [`TracingSink`].
pub const ACCESS_TARGET: &str = "request_observer::access";

/// Something that accepts one structured record per handled request.
///
/// Failures are the sink's own business: the observer calls `emit` once and
/// does not inspect the outcome.
pub trait RecordSink: Send + Sync {
    fn emit(&self, record: &AccessRecord);
}

impl<F> RecordSink for F
where
    F: Fn(&AccessRecord) + Send + Sync,
{
    fn emit(&self, record: &AccessRecord) {
        self(record)
    }
}

/// Emits each record as an `INFO` event with one field per record field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl RecordSink for TracingSink {
    fn emit(&self, record: &AccessRecord) {
        tracing::info!(
            target: ACCESS_TARGET,
            hostname = %record.hostname,
            time = %record.time,
            statusCode = record.status_code,
            latency = ?record.latency,
            clientIP = %record.client_ip,
            method = %record.method,
            path = %record.path,
            rawQuery = %record.raw_query,
            referer = %record.referer,
            userAgent = %record.user_agent,
            requestBodySize = record.request_body_size,
            requestBody = %record.request_body,
            error = %record.error,
            "request handled"
        );
    }
}

/// Keeps every emitted record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<AccessRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records emitted so far, oldest first.
    pub fn records(&self) -> Vec<AccessRecord> {
        self.records.lock().expect("memory sink mutex poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("memory sink mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().expect("memory sink mutex poisoned").clear();
    }
}

impl RecordSink for MemorySink {
    fn emit(&self, record: &AccessRecord) {
        self.records
            .lock()
            .expect("memory sink mutex poisoned")
            .push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn record(path: &str) -> AccessRecord {
        AccessRecord {
            hostname: "h".into(),
            time: String::new(),
            status_code: 200,
            latency: Duration::ZERO,
            client_ip: String::new(),
            method: "GET".into(),
            path: path.into(),
            raw_query: String::new(),
            referer: String::new(),
            user_agent: String::new(),
            request_body_size: 0,
            request_body: String::new(),
            error: String::new(),
        }
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.emit(&record("/a"));
        sink.emit(&record("/b"));
        let paths: Vec<String> = sink.records().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/a", "/b"]);

        sink.clear();
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn test_closure_sink() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let sink: Arc<dyn RecordSink> = Arc::new(move |_: &AccessRecord| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sink.emit(&record("/"));
        sink.emit(&record("/"));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_sink_emits_one_info_event() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();

        let mut created = record("/users");
        created.method = "POST".into();
        created.status_code = 201;
        created.request_body_size = 40;
        created.latency = Duration::from_millis(3);
        tracing::subscriber::with_default(subscriber, || TracingSink.emit(&created));

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["target"], ACCESS_TARGET);

        let fields = &event["fields"];
        assert_eq!(fields["message"], "request handled");
        assert_eq!(fields["statusCode"], 201);
        assert_eq!(fields["requestBodySize"], 40);
        assert_eq!(fields["method"], "POST");
        assert_eq!(fields["path"], "/users");
        assert_eq!(fields["latency"], "3ms");
        for name in [
            "hostname",
            "time",
            "statusCode",
            "latency",
            "clientIP",
            "method",
            "path",
            "rawQuery",
            "referer",
            "userAgent",
            "requestBodySize",
            "requestBody",
            "error",
        ] {
            assert!(fields.get(name).is_some(), "missing field {name}");
        }
    }
}

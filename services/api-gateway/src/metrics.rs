//! Upload counters exposed on `/metrics`.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    uploads: IntCounterVec,
    fields_extracted: IntCounter,
    orphan_rows: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("fieldmark".to_string()), None)?;

        let uploads = IntCounterVec::new(
            Opts::new("uploads_total", "Uploads received, by outcome"),
            &["outcome"],
        )?;
        let fields_extracted = IntCounter::new(
            "fields_extracted_total",
            "Fields extracted from successful uploads",
        )?;
        let orphan_rows = IntCounter::new(
            "orphan_rows_total",
            "Rows dropped because they appeared before any field marker",
        )?;

        registry.register(Box::new(uploads.clone()))?;
        registry.register(Box::new(fields_extracted.clone()))?;
        registry.register(Box::new(orphan_rows.clone()))?;

        Ok(Self {
            registry,
            uploads,
            fields_extracted,
            orphan_rows,
        })
    }

    pub fn record_success(&self, fields: usize, orphan_rows: usize) {
        self.uploads.with_label_values(&["success"]).inc();
        self.fields_extracted.inc_by(fields as u64);
        self.orphan_rows.inc_by(orphan_rows as u64);
    }

    pub fn record_failure(&self, code: &str) {
        self.uploads.with_label_values(&[code]).inc();
    }

    pub fn encode(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        match encoder.encode(&self.registry.gather(), &mut buffer) {
            Ok(()) => String::from_utf8(buffer)
                .unwrap_or_else(|_| "Error encoding metrics".to_string()),
            Err(_) => "Error encoding metrics".to_string(),
        }
    }
}

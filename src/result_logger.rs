//! Human-facing result reporting

use tracing::info;

use crate::audit_module::AnalysisResult;

/// Receives every result record for reporting
///
/// Fire-and-forget: nothing a logger does can fail an analysis pass.
pub trait ResultLogger: Send + Sync {
    fn result(&self, label: &str, record: &AnalysisResult, subject_url: &str);
}

/// Logs each record as one `info` line with its JSON form
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingResultLogger;

impl ResultLogger for TracingResultLogger {
    fn result(&self, label: &str, record: &AnalysisResult, subject_url: &str) {
        info!(
            target: "pagespeed::result",
            context = %record.context,
            "[{label}] {subject_url}: {}",
            record.to_json()
        );
    }
}

/// Discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResultLogger;

impl ResultLogger for NoOpResultLogger {
    #[inline(always)]
    fn result(&self, _label: &str, _record: &AnalysisResult, _subject_url: &str) {}
}

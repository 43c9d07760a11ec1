//! Small helpers shared across subcommands.

use std::path::PathBuf;

/// Default location for the adapter disk cache (§10.4), next to wherever
/// the process happens to run rather than a fixed system path, mirroring
/// the corpus's preference for a `./`-relative data directory over `/var`.
pub fn default_cache_dir() -> PathBuf {
    PathBuf::from(".sc-crawler-cache")
}

/// Renders a [`sc_core::PipelineSummary`] as the human-readable one-line
/// summary `pull` prints per vendor (§7's "partial success ... summary
/// log").
pub fn format_summary(summary: &sc_core::PipelineSummary) -> String {
    if summary.cancelled {
        return format!("{}: cancelled", summary.vendor_id);
    }
    let rows: usize = summary.stages.iter().map(|s| s.rows).sum();
    format!("{}: {} stage(s), {rows} row(s)", summary.vendor_id, summary.stages.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::{PipelineSummary, StageOutcome};

    #[test]
    fn summary_sums_rows_across_stages() {
        let summary = PipelineSummary {
            vendor_id: "hcloud".to_string(),
            stages: vec![StageOutcome { stage: "region", rows: 1 }, StageOutcome { stage: "zone", rows: 1 }],
            cancelled: false,
        };
        assert_eq!(format_summary(&summary), "hcloud: 2 stage(s), 2 row(s)");
    }

    #[test]
    fn cancelled_summary_says_so() {
        let summary = PipelineSummary { vendor_id: "aws".to_string(), stages: vec![], cancelled: true };
        assert_eq!(format_summary(&summary), "aws: cancelled");
    }
}

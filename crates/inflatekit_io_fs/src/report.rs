//! Replication report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters and diagnostics for one `replicate_tree` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportReplicate {
    /// Number of completed copy-index passes.
    pub cnt_passes: u64,
    /// Source files visited, summed over all passes.
    pub cnt_scanned: u64,
    /// Destination directories ensured, summed over all passes.
    pub cnt_dirs_mirrored: u64,
    /// Renamed files written.
    pub cnt_copied: u64,
    /// Total bytes written across all renamed files.
    pub n_bytes_copied: u64,
    /// Non-fatal warnings collected during traversal.
    pub warnings: Vec<String>,
}

impl ReportReplicate {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_passes".to_string(), self.cnt_passes);
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_dirs_mirrored".to_string(), self.cnt_dirs_mirrored);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("n_bytes_copied".to_string(), self.n_bytes_copied);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} passes={} scanned={} dirs={} copied={} bytes={} warnings={}",
            self.cnt_passes,
            self.cnt_scanned,
            self.cnt_dirs_mirrored,
            self.cnt_copied,
            self.n_bytes_copied,
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportReplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[REPLICATE]"))
    }
}

/// Mutable accumulator for replication statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportReplicateBuilder {
    /// See [`ReportReplicate::cnt_passes`].
    pub cnt_passes: u64,
    /// See [`ReportReplicate::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportReplicate::cnt_dirs_mirrored`].
    pub cnt_dirs_mirrored: u64,
    /// See [`ReportReplicate::cnt_copied`].
    pub cnt_copied: u64,
    /// See [`ReportReplicate::n_bytes_copied`].
    pub n_bytes_copied: u64,
    /// See [`ReportReplicate::warnings`].
    pub warnings: Vec<String>,
}

impl ReportReplicateBuilder {
    /// Increment completed pass count by one.
    pub fn add_pass(&mut self) {
        self.cnt_passes += 1;
    }

    /// Increment scanned count by one.
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    /// Increment mirrored directory count by one.
    pub fn add_dir_mirrored(&mut self) {
        self.cnt_dirs_mirrored += 1;
    }

    /// Record one written file of `n_bytes` bytes.
    pub fn add_copied(&mut self, n_bytes: u64) {
        self.cnt_copied += 1;
        self.n_bytes_copied += n_bytes;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportReplicate {
        ReportReplicate {
            cnt_passes: self.cnt_passes,
            cnt_scanned: self.cnt_scanned,
            cnt_dirs_mirrored: self.cnt_dirs_mirrored,
            cnt_copied: self.cnt_copied,
            n_bytes_copied: self.n_bytes_copied,
            warnings: self.warnings,
        }
    }
}

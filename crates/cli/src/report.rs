//! Run reports.
//!
//! One run produces a [`FileOutcome`] per notebook plus aggregate
//! [`RunStats`]. The text rendering matches the batch summary the wiki
//! maintainers are used to; `--json` serializes the same data instead.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

/// Result of processing a single notebook.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// Notebook path as discovered.
    pub path: PathBuf,
    /// Number of markdown fragments that were rewritten.
    pub fragments_changed: usize,
    /// Error message when the notebook could not be processed.
    pub error: Option<String>,
}

impl FileOutcome {
    /// Whether this notebook was (or would be) modified.
    pub fn changed(&self) -> bool {
        self.error.is_none() && self.fragments_changed > 0
    }
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// Notebooks discovered.
    pub total: usize,
    /// Notebooks with at least one rewritten fragment.
    pub fixed: usize,
    /// Notebooks that failed to load, rewrite, or save.
    pub failed: usize,
    /// Wall-clock time for the whole run in milliseconds.
    pub processing_time_ms: f64,
}

/// Everything a run has to report.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Per-notebook outcomes in path order.
    pub outcomes: Vec<FileOutcome>,
    /// Aggregate statistics.
    pub stats: RunStats,
}

impl RunReport {
    /// Build a report from per-file outcomes, computing the aggregates.
    pub fn new(outcomes: Vec<FileOutcome>, processing_time_ms: f64) -> Self {
        let total = outcomes.len();
        let fixed = outcomes.iter().filter(|outcome| outcome.changed()).count();
        let failed = outcomes
            .iter()
            .filter(|outcome| outcome.error.is_some())
            .count();
        Self {
            outcomes,
            stats: RunStats {
                total,
                fixed,
                failed,
                processing_time_ms,
            },
        }
    }

    /// Whether any notebook failed.
    pub fn has_failures(&self) -> bool {
        self.stats.failed > 0
    }

    /// Render the human-readable report.
    pub fn render_text(&self, dry_run: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Found {} notebooks to process", self.stats.total);
        let _ = writeln!(out);

        for outcome in &self.outcomes {
            let path = outcome.path.display();
            if let Some(error) = &outcome.error {
                let _ = writeln!(out, "  ✗ Failed {path}: {error}");
            } else if outcome.changed() && dry_run {
                let _ = writeln!(out, "  ✓ Would fix {path}");
            } else if outcome.changed() {
                let _ = writeln!(out, "  ✓ Fixed {path}");
            } else {
                let _ = writeln!(out, "  - No changes needed for {path}");
            }
        }

        let verb = if dry_run { "Would fix" } else { "Fixed" };
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(
            out,
            "Summary: {verb} {} out of {} notebooks",
            self.stats.fixed, self.stats.total
        );
        let _ = writeln!(out, "{}", "=".repeat(60));
        out
    }
}

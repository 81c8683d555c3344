use serde::Serialize;
use std::fmt;

/// Scroll position at which a page section was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Top,
    Bottom,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Top => write!(f, "top"),
            Section::Bottom => write!(f, "bottom"),
        }
    }
}

/// Result of checking the status column in one page section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionCheck {
    /// Every cell matched the expected label.
    AllMatched { rows: usize },
    /// The first cell whose text differed from the expected label.
    Mismatch { found: String },
    /// The column could not be read at all.
    Unreadable { error: String },
}

/// Terminal outcome of walking one status's result pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StatusOutcome {
    /// Every checked cell matched the expected label on every page.
    Verified { pages: u32 },
    /// A cell differed from the expected label; processing stopped there.
    Mismatch {
        page: u32,
        section: Section,
        found: String,
    },
    /// The status column could not be read; processing stopped there.
    CheckFailed {
        page: u32,
        section: Section,
        error: String,
    },
}

impl StatusOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, StatusOutcome::Verified { .. })
    }
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusOutcome::Verified { pages } => {
                write!(f, "verified ({} page(s))", pages)
            }
            StatusOutcome::Mismatch {
                page,
                section,
                found,
            } => write!(
                f,
                "MISMATCH on page {} ({} section): found '{}'",
                page, section, found
            ),
            StatusOutcome::CheckFailed {
                page,
                section,
                error,
            } => write!(
                f,
                "CHECK FAILED on page {} ({} section): {}",
                page, section, error
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub label: String,
    pub outcome: StatusOutcome,
}

/// Aggregated result of one verification run, one entry per worklist
/// status processed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub statuses: Vec<StatusReport>,
}

impl RunReport {
    pub fn push(&mut self, report: StatusReport) {
        self.statuses.push(report);
    }

    pub fn all_verified(&self) -> bool {
        self.statuses.iter().all(|s| s.outcome.is_verified())
    }

    /// Human-readable summary, one line per status.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for status in &self.statuses {
            out.push_str(&format!("status '{}': {}\n", status.label, status.outcome));
        }
        out.push_str(if self.all_verified() {
            "result: all statuses verified"
        } else {
            "result: verification FAILED"
        });
        out
    }
}

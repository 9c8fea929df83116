/*!
 * Narrow down the list of error reports by title search, system, and subsystem.
 */
use crate::report::ErrorReport;

/// Criteria for selecting error reports. Unset (or empty) fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorFilter {
    /// Case insensitive substring of the title.
    pub search: Option<String>,
    /// System name, compared ignoring case.
    pub system: Option<String>,
    /// Subsystem name, compared ignoring case.
    pub subsystem: Option<String>,
    /// Hide reports that have been marked resolved.
    pub unresolved_only: bool,
}

impl ErrorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search<S: Into<String>>(mut self, search: S) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn system<S: Into<String>>(mut self, system: S) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn subsystem<S: Into<String>>(mut self, subsystem: S) -> Self {
        self.subsystem = Some(subsystem.into());
        self
    }

    pub fn unresolved_only(mut self, unresolved_only: bool) -> Self {
        self.unresolved_only = unresolved_only;
        self
    }

    /// Does this report pass the filter?
    pub fn matches(&self, report: &ErrorReport) -> bool {
        if self.unresolved_only && report.resolved {
            return false;
        }

        if let Some(search) = non_empty(&self.search) {
            if !report.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }

        if let Some(system) = non_empty(&self.system) {
            if report.system.to_lowercase() != system.to_lowercase() {
                return false;
            }
        }

        if let Some(subsystem) = non_empty(&self.subsystem) {
            if report.subsystem.to_lowercase() != subsystem.to_lowercase() {
                return false;
            }
        }

        true
    }

    /// Select the matching reports, preserving order.
    pub fn apply<'a>(&self, reports: &'a [ErrorReport]) -> Vec<&'a ErrorReport> {
        reports.iter().filter(|rpt| self.matches(rpt)).collect()
    }
}

fn non_empty(val: &Option<String>) -> Option<&str> {
    val.as_deref().filter(|s| !s.is_empty())
}

use crate::HarvestReport;

/// Presentation-ready view of a report, shared by the console table and the
/// web results page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportView {
    pub rows: Vec<ReportRowView>,
    pub repository_count: usize,
    pub email_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRowView {
    pub repository: String,
    pub emails: Vec<String>,
    pub email_count: usize,
}

impl ReportRowView {
    /// Emails joined for single-cell display.
    pub fn joined_emails(&self, separator: &str) -> String {
        self.emails.join(separator)
    }
}

impl ReportView {
    pub fn from_report(report: &HarvestReport) -> Self {
        let rows: Vec<ReportRowView> = report
            .iter()
            .map(|result| ReportRowView {
                repository: result.repository.clone(),
                emails: result.emails.clone(),
                email_count: result.emails.len(),
            })
            .collect();
        Self {
            repository_count: rows.len(),
            email_count: rows.iter().map(|row| row.email_count).sum(),
            rows,
        }
    }
}

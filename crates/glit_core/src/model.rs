use serde::{Deserialize, Serialize};

/// One repository owned by the target user, as listed by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub name: String,
    /// Rendered page of the repository, not its API URL.
    pub page_url: String,
}

impl RepositoryDescriptor {
    pub fn new(name: impl Into<String>, page_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            page_url: page_url.into(),
        }
    }
}

/// Addresses found on one repository page, in match order, duplicates kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestResult {
    pub repository: String,
    pub emails: Vec<String>,
}

impl HarvestResult {
    pub fn new(repository: impl Into<String>, emails: Vec<String>) -> Self {
        Self {
            repository: repository.into(),
            emails,
        }
    }

    /// Entry recorded for a repository whose page could not be fetched.
    pub fn empty(repository: impl Into<String>) -> Self {
        Self::new(repository, Vec::new())
    }
}

/// Ordered output of one harvest run.
///
/// Entries can only be appended; the order is the enumeration order of the
/// repositories. Serializes as a bare JSON array of results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HarvestReport {
    results: Vec<HarvestResult>,
}

impl HarvestReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, result: HarvestResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[HarvestResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HarvestResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn total_emails(&self) -> usize {
        self.results.iter().map(|r| r.emails.len()).sum()
    }

    pub fn into_results(self) -> Vec<HarvestResult> {
        self.results
    }
}

impl FromIterator<HarvestResult> for HarvestReport {
    fn from_iter<I: IntoIterator<Item = HarvestResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HarvestReport {
    type Item = &'a HarvestResult;
    type IntoIter = std::slice::Iter<'a, HarvestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

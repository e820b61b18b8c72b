use std::path::PathBuf;

/// What a front-end asks the pipeline to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestRequest {
    pub profile_url: String,
    /// Collected from the user but not acted on: only the default branch's
    /// rendered page is scanned.
    pub all_branches: bool,
    /// Where to write the finished report, if anywhere.
    pub export_path: Option<PathBuf>,
}

impl HarvestRequest {
    pub fn new(profile_url: impl Into<String>) -> Self {
        Self {
            profile_url: profile_url.into().trim().to_string(),
            all_branches: false,
            export_path: None,
        }
    }

    pub fn all_branches(mut self, all_branches: bool) -> Self {
        self.all_branches = all_branches;
        self
    }

    pub fn export_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = Some(path.into());
        self
    }
}

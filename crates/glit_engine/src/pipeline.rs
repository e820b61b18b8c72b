use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use futures_util::stream::{self, StreamExt};
use glit_core::{HarvestReport, HarvestRequest, HarvestResult, RepositoryDescriptor};
use glit_logging::{glit_debug, glit_info, glit_warn};

use crate::enumerate::{EnumerationError, RepositoryEnumerator};
use crate::export::{export_report, ExportError};
use crate::extract::EmailExtractor;
use crate::{HarvestEvent, PageFetcher};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: HarvestEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: HarvestEvent) {}
}

/// Collects events in memory, for front-ends that render after the run.
#[derive(Debug, Default)]
pub struct RecordingProgressSink {
    events: Mutex<Vec<HarvestEvent>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<HarvestEvent> {
        match self.events.lock() {
            Ok(mut events) => events.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }
}

impl ProgressSink for RecordingProgressSink {
    fn emit(&self, event: HarvestEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Repository pages fetched at once. `1` keeps the strictly sequential order of requests.
    pub concurrency: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),
}

/// A finished run: the report, plus the export result when one was requested.
///
/// A failed export leaves `report` untouched.
#[derive(Debug)]
pub struct HarvestOutcome {
    pub report: HarvestReport,
    pub export: Option<Result<PathBuf, ExportError>>,
}

/// Enumerate, fetch each page, extract, aggregate.
pub struct HarvestPipeline {
    enumerator: Arc<dyn RepositoryEnumerator>,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn EmailExtractor>,
    settings: PipelineSettings,
}

impl HarvestPipeline {
    pub fn new(
        enumerator: Arc<dyn RepositoryEnumerator>,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn EmailExtractor>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            enumerator,
            fetcher,
            extractor,
            settings,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.settings.concurrency.max(1)
    }

    /// Runs the harvest and, if the request names a path, exports the finished report once.
    pub async fn run(
        &self,
        request: &HarvestRequest,
        sink: &dyn ProgressSink,
    ) -> Result<HarvestOutcome, HarvestError> {
        if request.all_branches {
            glit_info!("all-branches scan is not supported; scanning each default branch page");
        }

        let report = self.harvest(&request.profile_url, sink).await?;

        let export = request.export_path.as_ref().map(|path| {
            let result = export_report(path, &report);
            match &result {
                Ok(written) => glit_info!("Report written to {}", written.display()),
                Err(err) => glit_warn!("Export failed: {}", err),
            }
            result
        });

        Ok(HarvestOutcome { report, export })
    }

    /// One entry per enumerated repository, in enumeration order.
    ///
    /// Only enumeration failure aborts; a page that cannot be fetched yields an empty entry.
    pub async fn harvest(
        &self,
        profile_url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<HarvestReport, HarvestError> {
        let repositories = self.enumerator.list_repositories(profile_url).await?;
        glit_info!(
            "{} repositories listed for {}",
            repositories.len(),
            profile_url
        );
        sink.emit(HarvestEvent::RepositoriesListed {
            count: repositories.len(),
        });

        let mut report = HarvestReport::with_capacity(repositories.len());
        let pending: Vec<_> = repositories
            .iter()
            .enumerate()
            .map(|(index, repository)| self.harvest_repository(index, repository, sink))
            .collect();
        // `buffered` yields in input order whatever order the fetches finish in.
        let mut results = stream::iter(pending).buffered(self.concurrency());
        while let Some(result) = results.next().await {
            report.push(result);
        }

        glit_info!(
            "Harvest of {} finished: {} repositories, {} addresses",
            profile_url,
            report.len(),
            report.total_emails()
        );
        Ok(report)
    }

    async fn harvest_repository(
        &self,
        index: usize,
        repository: &RepositoryDescriptor,
        sink: &dyn ProgressSink,
    ) -> HarvestResult {
        sink.emit(HarvestEvent::RepositoryStarted {
            index,
            name: repository.name.clone(),
        });

        match self.fetcher.fetch(&repository.page_url).await {
            Ok(page) => {
                let emails = self.extractor.extract(&page.body);
                glit_debug!(
                    "{}: {} addresses on {}",
                    repository.name,
                    emails.len(),
                    page.final_url
                );
                sink.emit(HarvestEvent::RepositoryFinished {
                    index,
                    name: repository.name.clone(),
                    emails: emails.len(),
                });
                HarvestResult::new(repository.name.clone(), emails)
            }
            Err(error) => {
                glit_warn!("Skipping {}: {}", repository.name, error);
                sink.emit(HarvestEvent::RepositoryFailed {
                    index,
                    name: repository.name.clone(),
                    error,
                });
                HarvestResult::empty(repository.name.clone())
            }
        }
    }
}

//! Glit engine: repository enumeration, page fetching and email extraction.
mod decode;
mod enumerate;
mod export;
mod extract;
mod fetch;
mod filename;
mod persist;
mod pipeline;
mod types;

use std::sync::Arc;

pub use decode::{decode_html, decode_html_lossy, DecodeError, DecodedHtml};
pub use enumerate::{
    listing_url, parse_listing, ApiRepositoryEnumerator, EnumerationError, RepositoryEnumerator,
};
pub use export::{export_report, read_report, ExportError};
pub use extract::{find_emails, visible_text, EmailExtractor, RegexEmailExtractor, EMAIL_PATTERN};
pub use fetch::{DecodePolicy, FetchSettings, PageFetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use filename::deterministic_export_filename;
pub use persist::{ensure_output_dir, write_atomic, AtomicFileWriter, PersistError};
pub use pipeline::{
    HarvestError, HarvestOutcome, HarvestPipeline, NoopProgressSink, PipelineSettings,
    ProgressSink, RecordingProgressSink,
};
pub use types::{FailureKind, FetchError, HarvestEvent, PageContent};

/// Pipeline wired to the network: one shared HTTP client for the listing and the pages.
///
/// The listing must decode cleanly; repository pages decode lossily so a stray
/// byte does not cost the whole page.
pub fn build_pipeline(
    fetch: FetchSettings,
    settings: PipelineSettings,
) -> Result<HarvestPipeline, FetchError> {
    let listing = ReqwestFetcher::new(fetch)?;
    let pages = listing.clone().with_decoding(DecodePolicy::Lossy);
    let enumerator = Arc::new(ApiRepositoryEnumerator::new(listing));
    Ok(HarvestPipeline::new(
        enumerator,
        Arc::new(pages),
        Arc::new(RegexEmailExtractor),
        settings,
    ))
}

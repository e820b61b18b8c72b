use std::sync::Once;

use glit_core::{HarvestReport, HarvestRequest, HarvestResult, RepositoryDescriptor, ReportView};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(glit_logging::initialize_for_tests);
}

fn sample_report() -> HarvestReport {
    let mut report = HarvestReport::new();
    report.push(HarvestResult::new(
        "alpha",
        vec!["a@example.com".to_string(), "a@example.com".to_string()],
    ));
    report.push(HarvestResult::empty("beta"));
    report.push(HarvestResult::new("gamma", vec!["g@example.org".to_string()]));
    report
}

#[test]
fn report_keeps_append_order_and_duplicates() {
    init_logging();
    let report = sample_report();

    let names: Vec<&str> = report.iter().map(|r| r.repository.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    assert_eq!(report.len(), 3);
    assert_eq!(report.total_emails(), 3);
    assert_eq!(report.results()[0].emails.len(), 2);
    assert!(report.results()[1].emails.is_empty());
}

#[test]
fn empty_report_is_not_an_error_value() {
    let report = HarvestReport::new();
    assert!(report.is_empty());
    assert_eq!(report.total_emails(), 0);
    assert_eq!(ReportView::from_report(&report), ReportView::default());
}

#[test]
fn report_serializes_as_plain_array() {
    let report = sample_report();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"repository": "alpha", "emails": ["a@example.com", "a@example.com"]},
            {"repository": "beta", "emails": []},
            {"repository": "gamma", "emails": ["g@example.org"]},
        ])
    );

    let back: HarvestReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn view_model_mirrors_report() {
    let view = ReportView::from_report(&sample_report());
    assert_eq!(view.repository_count, 3);
    assert_eq!(view.email_count, 3);
    assert_eq!(view.rows[0].repository, "alpha");
    assert_eq!(view.rows[0].email_count, 2);
    assert_eq!(view.rows[0].joined_emails(", "), "a@example.com, a@example.com");
    assert_eq!(view.rows[1].joined_emails(", "), "");
}

#[test]
fn request_trims_url_and_defaults_to_no_export() {
    let request = HarvestRequest::new("  https://host/users/alice \n");
    assert_eq!(request.profile_url, "https://host/users/alice");
    assert!(!request.all_branches);
    assert_eq!(request.export_path, None);

    let request = request.all_branches(true).export_to("out.json");
    assert!(request.all_branches);
    assert_eq!(request.export_path.unwrap().to_str(), Some("out.json"));
}

#[test]
fn descriptor_builder_keeps_fields() {
    let repo = RepositoryDescriptor::new("alpha", "https://host/alice/alpha");
    assert_eq!(repo.name, "alpha");
    assert_eq!(repo.page_url, "https://host/alice/alpha");
}

use std::sync::Arc;
use std::time::Duration;

use rivalscope_core::{AnalysisJob, ScrapedPage};

use super::*;
use crate::test_support::{orchestrator, settings, site, StubClient};

async fn wait_for_terminal(orchestrator: &Orchestrator, job_id: &str) -> AnalysisJob {
    for _ in 0..200 {
        if let Some(job) = orchestrator.store().get(job_id).await {
            if job.state.is_terminal() {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("job {job_id} never reached a terminal state");
}

fn report(outcome: &JobOutcome) -> &CompetitorAnalysis {
    match outcome {
        JobOutcome::Report(doc) => doc,
        JobOutcome::Failure(failure) => panic!("expected a report, got {failure:?}"),
    }
}

#[test]
fn short_single_url_runs_inline() {
    assert_eq!(
        ProcessingMethod::select("acme.io", 100),
        ProcessingMethod::Synchronous
    );
    assert_eq!(
        ProcessingMethod::select("  https://acme.io/pricing  ", 100),
        ProcessingMethod::Synchronous
    );
}

#[test]
fn long_or_listed_input_runs_in_background() {
    let long = format!("https://acme.io/{}", "a".repeat(120));
    assert_eq!(ProcessingMethod::select(&long, 100), ProcessingMethod::Background);
    assert_eq!(
        ProcessingMethod::select("acme.io,globex.com", 100),
        ProcessingMethod::Background
    );
    assert_eq!(
        ProcessingMethod::select("acme.io;globex.com", 100),
        ProcessingMethod::Background
    );
}

#[test]
fn inline_threshold_counts_characters_not_bytes() {
    // 20 characters, 38 bytes.
    let idn = "https://".to_string() + &"\u{30ed}".repeat(9) + ".jp";
    assert_eq!(idn.chars().count(), 20);
    assert!(idn.len() > 30);
    assert_eq!(ProcessingMethod::select(&idn, 20), ProcessingMethod::Synchronous);
    assert_eq!(ProcessingMethod::select(&idn, 19), ProcessingMethod::Background);
}

#[test]
fn processing_method_wire_names() {
    assert_eq!(
        serde_json::to_value(ProcessingMethod::Synchronous).unwrap(),
        serde_json::json!("synchronous")
    );
    assert_eq!(
        serde_json::to_value(ProcessingMethod::Background).unwrap(),
        serde_json::json!("background")
    );
}

#[test]
fn findings_name_title_and_description() {
    let mut page = ScrapedPage::placeholder("https://acme.io", "timed out");
    assert_eq!(page_findings(&page), None);

    page.title = "Acme Rockets".to_string();
    assert_eq!(
        page_findings(&page).as_deref(),
        Some("page title \"Acme Rockets\"")
    );

    page.meta_tags
        .insert("og:description".to_string(), "Rides to orbit".to_string());
    let findings = page_findings(&page).unwrap();
    assert!(findings.contains("Acme Rockets"));
    assert!(findings.contains("Rides to orbit"));
}

#[tokio::test]
async fn invalid_url_creates_no_job() {
    let orchestrator = orchestrator(Arc::new(StubClient::report()), settings(Duration::from_secs(5)));

    for raw in ["", "   ", "ftp://acme.io", "not a url", "acme.io, globex.com"] {
        let err = orchestrator.submit(raw).await.unwrap_err();
        assert!(matches!(err, SubmitError::InvalidUrl(_)), "{raw:?}: {err}");
    }
    assert!(orchestrator.store().is_empty().await);
}

#[tokio::test]
async fn inline_submission_returns_completed_report() {
    let site = site().await;
    let client = Arc::new(StubClient::report());
    let orchestrator = orchestrator(Arc::clone(&client), settings(Duration::from_secs(10)));

    let submission = orchestrator.submit(&site.uri()).await.unwrap();
    let Submission::Finished {
        job_id,
        state,
        outcome,
    } = submission
    else {
        panic!("expected inline processing");
    };

    assert_eq!(state, JobState::Completed);
    let doc = report(&outcome);
    assert_eq!(doc.summary(), "Acme sells rides to orbit for small satellite teams.");
    assert_eq!(doc.website_url(), site.uri());
    assert_eq!(client.calls(), 1);

    let stored = orchestrator.store().get(&job_id).await.unwrap();
    assert_eq!(stored.state, JobState::Completed);
    assert!(stored.completed_at.is_some());
    assert_eq!(stored.result, Some(outcome));
}

#[tokio::test]
async fn background_submission_is_processing_then_completes() {
    let site = site().await;
    let client = Arc::new(StubClient::report().with_delay(Duration::from_millis(200)));
    let mut settings = settings(Duration::from_secs(10));
    settings.inline_max_url_len = 5;
    let orchestrator = orchestrator(client, settings);

    let submission = orchestrator.submit(&site.uri()).await.unwrap();
    let Submission::Accepted {
        job_id,
        website_url,
    } = submission
    else {
        panic!("expected background processing");
    };
    assert_eq!(website_url, site.uri());

    let pending = orchestrator.store().get(&job_id).await.unwrap();
    assert_eq!(pending.state, JobState::Processing);
    assert!(pending.result.is_none());

    let job = wait_for_terminal(&orchestrator, &job_id).await;
    assert_eq!(job.state, JobState::Completed);
    assert_eq!(report(job.result.as_ref().unwrap()).competitors().len(), 1);
}

#[tokio::test]
async fn deadline_records_partial_report_with_page_context() {
    let site = site().await;
    let client = Arc::new(StubClient::report().with_delay(Duration::from_secs(30)));
    let orchestrator = orchestrator(client, settings(Duration::from_millis(500)));

    let Submission::Finished {
        job_id,
        state,
        outcome,
    } = orchestrator.submit(&site.uri()).await.unwrap()
    else {
        panic!("expected inline processing");
    };

    assert_eq!(state, JobState::Timeout);
    let doc = report(&outcome);
    assert!(doc.is_partial());
    assert!(doc.summary().contains("Acme Rockets"), "{}", doc.summary());
    assert!(doc.summary().contains("Reusable rockets for small teams"));

    let stored = orchestrator.store().get(&job_id).await.unwrap();
    assert_eq!(stored.state, JobState::Timeout);
}

#[tokio::test]
async fn transient_model_errors_are_retried() {
    let site = site().await;
    let client = Arc::new(StubClient::report().failing(2, 503));
    let orchestrator = orchestrator(Arc::clone(&client), settings(Duration::from_secs(10)));

    let Submission::Finished { state, .. } = orchestrator.submit(&site.uri()).await.unwrap() else {
        panic!("expected inline processing");
    };
    assert_eq!(state, JobState::Completed);
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn permanent_model_error_ends_in_error_state() {
    let site = site().await;
    let client = Arc::new(StubClient::report().failing(u32::MAX, 401));
    let orchestrator = orchestrator(Arc::clone(&client), settings(Duration::from_secs(10)));

    let Submission::Finished {
        job_id,
        state,
        outcome,
    } = orchestrator.submit(&site.uri()).await.unwrap()
    else {
        panic!("expected inline processing");
    };

    assert_eq!(state, JobState::Error);
    let JobOutcome::Failure(failure) = outcome else {
        panic!("expected a failure outcome");
    };
    assert_eq!(failure.error, FAILURE_MESSAGE);
    assert!(failure.details.contains("401"), "{}", failure.details);
    assert_eq!(client.calls(), 1);

    let stored = orchestrator.store().get(&job_id).await.unwrap();
    assert_eq!(stored.state, JobState::Error);
}

#[tokio::test]
async fn unreachable_site_still_gets_a_report() {
    let orchestrator = orchestrator(Arc::new(StubClient::report()), settings(Duration::from_secs(10)));

    let Submission::Finished { state, outcome, .. } =
        orchestrator.submit("http://127.0.0.1:9").await.unwrap()
    else {
        panic!("expected inline processing");
    };
    assert_eq!(state, JobState::Completed);
    assert!(!report(&outcome).summary().is_empty());
}

#[tokio::test]
async fn panicking_pipeline_is_recorded_as_error() {
    let site = site().await;
    let client = Arc::new(StubClient::report().panicking());
    let mut settings = settings(Duration::from_secs(10));
    settings.inline_max_url_len = 5;
    let orchestrator = orchestrator(client, settings);

    let Submission::Accepted { job_id, .. } = orchestrator.submit(&site.uri()).await.unwrap() else {
        panic!("expected background processing");
    };

    let job = wait_for_terminal(&orchestrator, &job_id).await;
    assert_eq!(job.state, JobState::Error);
    let Some(JobOutcome::Failure(failure)) = job.result else {
        panic!("expected a failure outcome");
    };
    assert!(failure.details.contains("aborted"), "{}", failure.details);
}

#[tokio::test]
async fn terminal_state_is_never_overwritten() {
    let site = site().await;
    let orchestrator = orchestrator(
        Arc::new(StubClient::report().with_delay(Duration::from_secs(30))),
        settings(Duration::from_millis(300)),
    );

    let Submission::Finished { job_id, .. } = orchestrator.submit(&site.uri()).await.unwrap() else {
        panic!("expected inline processing");
    };

    orchestrator
        .record(
            &job_id,
            JobState::Completed,
            JobOutcome::Report(Box::new(CompetitorAnalysis::fallback(&site.uri(), "late"))),
        )
        .await;

    let stored = orchestrator.store().get(&job_id).await.unwrap();
    assert_eq!(stored.state, JobState::Timeout);
    assert!(report(stored.result.as_ref().unwrap()).is_partial());
}

#[tokio::test]
async fn concurrent_submissions_get_distinct_jobs() {
    let site = site().await;
    let mut settings = settings(Duration::from_secs(10));
    settings.inline_max_url_len = 5;
    let orchestrator = orchestrator(Arc::new(StubClient::report()), settings);

    let mut ids = std::collections::HashSet::new();
    for _ in 0..20 {
        let Submission::Accepted { job_id, .. } = orchestrator.submit(&site.uri()).await.unwrap()
        else {
            panic!("expected background processing");
        };
        ids.insert(job_id);
    }
    assert_eq!(ids.len(), 20);
    assert_eq!(orchestrator.store().len().await, 20);
}

//! Service plus lifecycle, driven step by step.

use std::time::Duration;

use factlens as crate_root;
use serde_json::json;

use crate_root::app::Completion;
use crate_root::state::{ErrorKind, FactCheckError, LifecycleStatus};

use super::helpers::{CountingPages, ScriptedRpc, credential, input, service, session};

const CEILING: Duration = Duration::from_secs(5);

#[tokio::test]
/// What: A template answer ends in `Success` with linked citations.
///
/// Details:
/// - The presenter sees `Loading` first and the parsed record last.
async fn successful_request_reaches_success() {
    let svc = service(
        ScriptedRpc::default(),
        CountingPages {
            text: "Visible page text".to_string(),
            ..CountingPages::default()
        },
        credential(),
        CEILING,
    );
    let mut s = session();

    let pending = s.begin(input()).expect("renders");
    let applied = s.finish(svc.execute(pending).await).expect("renders");
    assert!(applied);

    let LifecycleStatus::Success(record) = s.status() else {
        panic!("expected success, got {:?}", s.status());
    };
    assert_eq!(record.truth_percentage, "75%");
    assert_eq!(record.sources.len(), 1);
    assert_eq!(record.sources[0].url, "http://bbc.com");
    assert!(record.fact_check_text.contains("(http://bbc.com)"));
    assert_eq!(record.context_text, "Reported widely.");

    assert_eq!(svc.rpc().contexts.borrow().as_slice(), ["Visible page text"]);
    let frames = &s.presenter().frames;
    assert!(frames.first().is_some_and(LifecycleStatus::is_loading));
    assert!(matches!(frames.last(), Some(LifecycleStatus::Success(_))));
    assert!(s.export().is_some_and(|t| t.starts_with("Truth Percentage: 75%")));
}

#[tokio::test]
/// What: Without a credential the remote call is never made.
async fn missing_credential_never_calls_the_service() {
    let svc = service(
        ScriptedRpc::default(),
        CountingPages::default(),
        None,
        CEILING,
    );
    let mut s = session();

    let pending = s.begin(input()).expect("renders");
    let completion = svc.execute(pending).await;
    assert_eq!(completion.outcome, Err(FactCheckError::MissingCredential));
    s.finish(completion).expect("renders");

    assert_eq!(svc.rpc().calls.get(), 0);
    assert_eq!(svc.pages().fetches.get(), 0);
    assert!(matches!(
        s.status(),
        LifecycleStatus::Error {
            kind: ErrorKind::InvalidCredential,
            retryable: false,
            ..
        }
    ));

    assert!(s.retry().expect("renders").is_none());
    assert_eq!(s.presenter().notices, ["Nothing to retry right now."]);
}

#[tokio::test]
/// What: Abort while loading wins over any later answer.
///
/// Details:
/// - The aborted attempt stops waiting on its own.
/// - A success delivered afterwards with the old ticket is discarded.
async fn abort_discards_late_resolution() {
    let svc = service(
        ScriptedRpc::hanging(),
        CountingPages::default(),
        credential(),
        CEILING,
    );
    let mut s = session();

    let pending = s.begin(input()).expect("renders");
    let old_ticket = pending.ticket.clone();
    let attempt = svc.execute(pending);
    assert!(s.abort().expect("renders"));

    let completion = attempt.await;
    assert_eq!(completion.outcome, Err(FactCheckError::UserAborted));
    assert!(!s.finish(completion).expect("renders"));

    let late = Completion {
        ticket: old_ticket,
        page_context: None,
        outcome: Ok(crate_root::parse::parse(super::helpers::TEMPLATE)),
    };
    assert!(!s.finish(late).expect("renders"));

    assert!(matches!(
        s.status(),
        LifecycleStatus::Error {
            kind: ErrorKind::UserAborted,
            retryable: true,
            ..
        }
    ));
}

#[tokio::test]
/// What: The hard ceiling turns a slow call into `Timeout`.
async fn slow_call_times_out() {
    let svc = service(
        ScriptedRpc::slow(Duration::from_secs(30)),
        CountingPages::default(),
        credential(),
        Duration::from_millis(50),
    );
    let mut s = session();

    let pending = s.begin(input()).expect("renders");
    let completion = svc.execute(pending).await;
    assert!(matches!(
        completion.outcome,
        Err(FactCheckError::Timeout { .. })
    ));
    s.finish(completion).expect("renders");
    assert!(matches!(
        s.status(),
        LifecycleStatus::Error {
            kind: ErrorKind::Timeout,
            retryable: true,
            ..
        }
    ));
}

#[tokio::test]
/// What: Retry reuses the fetched page context and reaches success.
async fn retry_after_network_error_reuses_context() {
    let svc = service(
        ScriptedRpc::replying(vec![Err(FactCheckError::Network("reset".to_string()))]),
        CountingPages {
            text: "ctx".to_string(),
            ..CountingPages::default()
        },
        credential(),
        CEILING,
    );
    let mut s = session();

    let pending = s.begin(input()).expect("renders");
    s.finish(svc.execute(pending).await).expect("renders");
    assert!(matches!(
        s.status(),
        LifecycleStatus::Error {
            kind: ErrorKind::NetworkOrUnknown,
            retryable: true,
            ..
        }
    ));

    let again = s.retry().expect("renders").expect("retry allowed");
    assert_eq!(again.page_context.as_deref(), Some("ctx"));
    assert!(s.status().is_loading());
    s.finish(svc.execute(again).await).expect("renders");

    assert!(matches!(s.status(), LifecycleStatus::Success(_)));
    assert_eq!(svc.pages().fetches.get(), 1);
    assert_eq!(svc.rpc().calls.get(), 2);
}

#[tokio::test]
/// What: Starting a new claim retires the request in flight.
async fn new_request_retires_the_previous_one() {
    let svc = service(
        ScriptedRpc::default(),
        CountingPages::default(),
        credential(),
        CEILING,
    );
    let mut s = session();

    let first = s.begin(input()).expect("renders");
    let second = s.begin(input()).expect("renders");
    assert!(first.ticket.cancellation().is_cancelled());

    let stale = svc.execute(first).await;
    assert!(!s.finish(stale).expect("renders"));
    assert!(s.status().is_loading());

    assert!(s.finish(svc.execute(second).await).expect("renders"));
    assert!(matches!(s.status(), LifecycleStatus::Success(_)));
}

#[tokio::test]
/// What: A non-text message content still yields a record.
async fn non_text_content_becomes_unprocessable_record() {
    let svc = service(
        ScriptedRpc::replying(vec![Ok(json!({"unexpected": true}))]),
        CountingPages::default(),
        credential(),
        CEILING,
    );
    let mut s = session();

    let pending = s.begin(input()).expect("renders");
    s.finish(svc.execute(pending).await).expect("renders");
    let LifecycleStatus::Success(record) = s.status() else {
        panic!("expected success, got {:?}", s.status());
    };
    assert_eq!(
        record.fact_check_text,
        "The API response could not be processed."
    );
    assert_eq!(record.truth_percentage, "N/A");
}

#[tokio::test]
/// What: Abort and dismiss outside their states are refused or harmless.
async fn abort_without_request_is_refused_and_dismiss_resets() {
    let mut s = session();
    assert!(!s.abort().expect("renders"));
    assert_eq!(s.presenter().notices, ["No request is running."]);

    s.begin(input()).expect("renders");
    s.dismiss().expect("renders");
    assert_eq!(s.status(), &LifecycleStatus::Idle);
    assert!(s.retry().expect("renders").is_none());
}

#[tokio::test]
/// What: Page text delivered with an outdated ticket is not kept for a retry.
async fn stale_page_context_is_not_recorded() {
    let mut s = session();
    let first = s.begin(input()).expect("renders");
    let second = s.begin(input()).expect("renders");

    let stale = Completion {
        ticket: first.ticket,
        page_context: Some("stale page".to_string()),
        outcome: Err(FactCheckError::Network("late".to_string())),
    };
    assert!(!s.finish(stale).expect("renders"));

    let current = Completion {
        ticket: second.ticket,
        page_context: None,
        outcome: Err(FactCheckError::Network("reset".to_string())),
    };
    assert!(s.finish(current).expect("renders"));

    let again = s.retry().expect("renders").expect("retry allowed");
    assert_eq!(again.page_context, None);
}

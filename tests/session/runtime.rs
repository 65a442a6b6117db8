//! Event-loop behavior over in-memory collaborators.

use std::time::Duration;

use factlens as crate_root;
use tokio::sync::mpsc;

use crate_root::app::{Mode, UserIntent, drive};
use crate_root::state::{ErrorKind, FactCheckError, LifecycleStatus};

use super::helpers::{CountingPages, ScriptedRpc, credential, input, service, session};

const CEILING: Duration = Duration::from_secs(5);

#[tokio::test]
/// What: One-shot mode stops once the answer is parsed.
async fn one_shot_returns_success() {
    let svc = service(
        ScriptedRpc::default(),
        CountingPages::default(),
        credential(),
        CEILING,
    );
    let mut s = session();
    let (_tx, mut rx) = mpsc::unbounded_channel::<UserIntent>();

    let status = drive(&mut s, &svc, input(), &mut rx, Mode::OneShot, "")
        .await
        .expect("renders");
    assert!(matches!(status, LifecycleStatus::Success(_)));
    assert_eq!(svc.rpc().calls.get(), 1);
}

#[tokio::test]
/// What: An abort intent ends a request that would never answer.
async fn abort_intent_ends_hanging_request() {
    let svc = service(
        ScriptedRpc::hanging(),
        CountingPages::default(),
        credential(),
        CEILING,
    );
    let mut s = session();
    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(UserIntent::Abort).expect("receiver alive");

    let status = drive(&mut s, &svc, input(), &mut rx, Mode::OneShot, "")
        .await
        .expect("renders");
    assert!(matches!(
        status,
        LifecycleStatus::Error {
            kind: ErrorKind::UserAborted,
            retryable: true,
            ..
        }
    ));
}

#[tokio::test]
/// What: Interactive mode ends when the intent source closes and nothing is pending.
async fn interactive_ends_when_intents_close() {
    let svc = service(
        ScriptedRpc::default(),
        CountingPages::default(),
        credential(),
        CEILING,
    );
    let mut s = session();
    let (tx, mut rx) = mpsc::unbounded_channel::<UserIntent>();
    drop(tx);

    let status = drive(&mut s, &svc, input(), &mut rx, Mode::Interactive, "")
        .await
        .expect("renders");
    assert!(matches!(status, LifecycleStatus::Success(_)));
}

#[tokio::test]
/// What: Dismiss closes the session whatever state it reached.
async fn dismiss_returns_idle() {
    let svc = service(
        ScriptedRpc::default(),
        CountingPages::default(),
        credential(),
        CEILING,
    );
    let mut s = session();
    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(UserIntent::Dismiss).expect("receiver alive");

    let status = drive(&mut s, &svc, input(), &mut rx, Mode::Interactive, "")
        .await
        .expect("renders");
    assert_eq!(status, LifecycleStatus::Idle);
    assert!(matches!(
        s.presenter().frames.last(),
        Some(LifecycleStatus::Idle)
    ));
}

#[tokio::test]
/// What: Interrupt after the request settled quits without changing the result.
async fn interrupt_after_settling_quits() {
    let svc = service(
        ScriptedRpc::default(),
        CountingPages::default(),
        None,
        CEILING,
    );
    let mut s = session();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let pending = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let _ = tx.send(UserIntent::Interrupt);
        tx
    });
    let status = drive(&mut s, &svc, input(), &mut rx, Mode::Interactive, "")
        .await
        .expect("renders");
    drop(pending);
    assert!(matches!(
        status,
        LifecycleStatus::Error {
            kind: ErrorKind::InvalidCredential,
            ..
        }
    ));
}

#[tokio::test]
/// What: The countdown restarts in full when a request is retried.
///
/// Details:
/// - The retry arrives after a countdown second has already passed, so a
///   running interval would tick at once and show one second less.
async fn retry_restarts_the_countdown() {
    let svc = service(
        ScriptedRpc::replying_then_hanging(vec![Err(FactCheckError::Network(
            "reset".to_string(),
        ))]),
        CountingPages::default(),
        credential(),
        CEILING,
    );
    let mut s = session();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let script = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let _ = tx.send(UserIntent::Retry);
        tokio::time::sleep(Duration::from_millis(300)).await;
        let _ = tx.send(UserIntent::Dismiss);
        tx
    });
    let status = drive(&mut s, &svc, input(), &mut rx, Mode::Interactive, "")
        .await
        .expect("renders");
    drop(script);
    assert_eq!(status, LifecycleStatus::Idle);

    let frames = &s.presenter().frames;
    let retried = frames
        .iter()
        .position(|f| matches!(f, LifecycleStatus::Error { .. }))
        .expect("first attempt failed");
    let after: Vec<&LifecycleStatus> = frames[retried + 1..]
        .iter()
        .filter(|f| f.is_loading())
        .collect();
    assert_eq!(
        after,
        vec![&LifecycleStatus::Loading {
            remaining_secs: 120
        }]
    );
}

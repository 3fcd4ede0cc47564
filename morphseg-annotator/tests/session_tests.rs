//! Session controller scenarios against the in-memory backend
//!
//! Tests cover:
//! - Noise marking, skipping and revisiting skipped words
//! - Queue priority: split-off senses, then skipped words, then buckets
//! - Blocked submission once every context is split off
//! - Sense splitting refused for single-context words
//! - Single-morph words, tagging and final submission
//! - Failed backend steps and manual retry
//! - Malformed words from the backend
//! - One-time phase notices

use morphseg_annotator::backend::{BackendCall, InMemoryBackend, Operation};
use morphseg_annotator::models::{SenseContext, WordBucket, WorkerSession};
use morphseg_annotator::view::{Gesture, Notice, RecordingView, Screen};
use morphseg_annotator::{SessionConfig, SessionController, SessionError, SessionState, WorkspaceError};
use morphseg_common::TagKind;
use std::sync::Arc;
use tokio::sync::mpsc;

const EMAIL: &str = "ann@example.com";

fn ctx(id: &str) -> SenseContext {
    SenseContext::new(format!("before {}", id), format!("after {}", id), id)
}

fn controller(backend: &Arc<InMemoryBackend>) -> SessionController<RecordingView> {
    SessionController::new(backend.clone(), RecordingView::new(), SessionConfig::default())
}

async fn start(backend: InMemoryBackend) -> (Arc<InMemoryBackend>, SessionController<RecordingView>) {
    let backend = Arc::new(backend.with_worker(EMAIL, WorkerSession::new("w-1", 0, 1)));
    let mut session = controller(&backend);
    session.login(EMAIL).await.expect("login should succeed");
    (backend, session)
}

fn completed(session: &SessionController<RecordingView>) -> u64 {
    session.worker().map(|w| w.completed_count).unwrap_or_default()
}

// =============================================================================
// Noise, skip, revisit
// =============================================================================

#[tokio::test]
async fn test_noise_advances_without_tagging() {
    // Given: bucket A = [fox, foxes], fresh worker
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox", "foxes"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")])
            .with_word("foxes", vec![false, false, true, false], vec![ctx("c2")]),
    )
    .await;
    assert_eq!(session.current_word(), Some("fox"));
    assert_eq!(session.state(), SessionState::Segmenting);

    // When: fox is marked as noise
    session.handle(Gesture::MarkNoise).await.unwrap();
    session.flush().await;

    // Then: foxes is next, nothing was tagged or counted
    assert_eq!(session.current_word(), Some("foxes"));
    assert_eq!(session.state(), SessionState::Segmenting);
    assert!(session.tag_sheet().is_none());
    assert_eq!(completed(&session), 0);
    assert_eq!(
        backend.calls_of(Operation::MarkNoise),
        vec![BackendCall::MarkNoise { form: "fox".into() }]
    );
    assert!(backend.calls_of(Operation::SubmitFinal).is_empty());
}

#[tokio::test]
async fn test_revisit_skipped_preempts_bucket() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox", "foxes", "ox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")])
            .with_word("foxes", vec![false; 4], vec![ctx("c2")])
            .with_word("ox", vec![false], vec![ctx("c3")]),
    )
    .await;

    session.mark_noise().await.unwrap();
    assert_eq!(session.current_word(), Some("foxes"));

    // Skip foxes; ox comes up and skipped words can be revisited
    session.defer().await.unwrap();
    assert_eq!(session.current_word(), Some("ox"));
    assert_eq!(session.counts().deferred, 1);
    match session.view_state().screen {
        Screen::Segmenting(view) => {
            assert!(view.unskip_visible);
            assert!(view.unskip_enabled);
        }
        other => panic!("expected segmenting screen, got {:?}", other),
    }

    // Revisit: foxes comes back although the bucket still holds ox
    session.activate_deferred().await.unwrap();
    assert_eq!(session.current_word(), Some("foxes"));
    assert_eq!(session.counts().deferred, 0);
    assert_eq!(session.counts().remaining, vec![1]);

    // ox was put back and follows
    session.mark_noise().await.unwrap();
    assert_eq!(session.current_word(), Some("ox"));

    session.flush().await;
    assert_eq!(
        backend.calls_of(Operation::MarkSkip),
        vec![BackendCall::MarkSkip { form: "foxes".into() }]
    );
    assert_eq!(session.view().phase_notices(), vec!["A", "Skipped words", "A"]);
}

#[tokio::test]
async fn test_revisit_disabled_without_skipped_words() {
    let (_, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")]),
    )
    .await;

    let result = session.handle(Gesture::ActivateDeferred).await;
    assert!(matches!(result, Err(SessionError::InvalidState { .. })));
    assert_eq!(session.current_word(), Some("fox"));
    assert_eq!(session.view().errors().len(), 1);
}

#[tokio::test]
async fn test_skipped_words_revisited_before_exhaustion() {
    let (_, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")]),
    )
    .await;

    session.defer().await.unwrap();
    assert_eq!(session.current_word(), Some("fox"));
    assert_eq!(session.state(), SessionState::Segmenting);

    // Skipping is disabled while revisiting
    assert!(matches!(session.defer().await, Err(SessionError::InvalidState { .. })));

    session.mark_noise().await.unwrap();
    assert_eq!(session.state(), SessionState::Exhausted);
}

// =============================================================================
// Senses
// =============================================================================

#[tokio::test]
async fn test_split_senses_come_before_skipped_and_bucket_words() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox", "bank", "ox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")])
            .with_word("bank", vec![false; 3], vec![ctx("b1"), ctx("b2"), ctx("b3")])
            .with_word("ox", vec![false], vec![ctx("c3")]),
    )
    .await;

    session.defer().await.unwrap();
    assert_eq!(session.current_word(), Some("bank"));

    session.split_sense("b2").unwrap();
    session.split_sense("b3").unwrap();
    session.split_sense("unknown").unwrap();
    assert_eq!(session.workspace().unwrap().active_count(), 1);

    // Revisit skipped words: the split-off senses still come first
    session.activate_deferred().await.unwrap();
    assert_eq!(session.current_word(), Some("bank"));
    let ids: Vec<_> = session
        .workspace()
        .unwrap()
        .active_contexts()
        .map(|c| c.context_id.clone())
        .collect();
    assert_eq!(ids, vec!["b2", "b3"]);
    match session.view_state().screen {
        Screen::Segmenting(view) => {
            assert!(view.split_allowed);
            assert!(!view.skip_enabled);
        }
        other => panic!("expected segmenting screen, got {:?}", other),
    }

    session.mark_noise().await.unwrap();
    assert_eq!(session.current_word(), Some("fox"));
    session.mark_noise().await.unwrap();
    assert_eq!(session.current_word(), Some("bank"));
    session.mark_noise().await.unwrap();
    assert_eq!(session.current_word(), Some("ox"));

    session.flush().await;
    assert_eq!(
        backend.calls_of(Operation::SplitSense),
        vec![
            BackendCall::SplitSense { context_id: "b2".into() },
            BackendCall::SplitSense { context_id: "b3".into() },
        ]
    );
}

#[tokio::test]
async fn test_splitting_last_context_blocks_submission() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["bank"]))
            .with_word("bank", vec![false; 3], vec![ctx("b1"), ctx("b2")]),
    )
    .await;

    session.split_sense("b1").unwrap();
    session.split_sense("b2").unwrap();
    assert_eq!(session.view().errors(), vec![SessionConfig::default().strings.no_contexts.as_str()]);

    let result = session.handle(Gesture::SubmitSegmentation).await;
    assert!(matches!(result, Err(SessionError::SubmissionBlocked(_))));
    assert_eq!(session.state(), SessionState::Segmenting);
    assert!(backend.calls_of(Operation::SubmitSegmentation).is_empty());
    match session.view_state().screen {
        Screen::Segmenting(view) => {
            assert!(!view.can_submit);
            assert!(view.contexts.iter().all(|row| !row.active));
        }
        other => panic!("expected segmenting screen, got {:?}", other),
    }

    // The word can still be marked as noise; the split senses follow
    session.mark_noise().await.unwrap();
    assert_eq!(session.current_word(), Some("bank"));
    assert_eq!(session.workspace().unwrap().active_count(), 2);
}

// =============================================================================
// Segmentation and tagging
// =============================================================================

#[tokio::test]
async fn test_split_refused_for_single_context() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox", "ox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")])
            .with_word("ox", vec![false], vec![ctx("c2")]),
    )
    .await;
    assert!(!session.workspace().unwrap().split_allowed());

    let result = session.handle(Gesture::SplitSense("c1".into())).await;
    assert!(matches!(result, Err(SessionError::InvalidState { .. })));
    assert_eq!(session.workspace().unwrap().active_count(), 1);
    assert_eq!(session.view().errors().len(), 1);

    // Noise moves on for good; no split-off sense brings fox back
    session.mark_noise().await.unwrap();
    session.flush().await;
    assert_eq!(session.current_word(), Some("ox"));
    assert!(backend.calls_of(Operation::SplitSense).is_empty());
}

#[tokio::test]
async fn test_single_morph_is_stem_without_tagging_step() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", true, ["fox", "ox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")])
            .with_word("ox", vec![false], vec![ctx("c2")]),
    )
    .await;

    session.submit_segmentation().await.unwrap();

    assert_eq!(session.current_word(), Some("ox"));
    assert_eq!(completed(&session), 1);
    assert!(!session
        .view()
        .renders
        .iter()
        .any(|r| matches!(r.screen, Screen::Tagging(_))));
    assert_eq!(
        backend.calls_of(Operation::SubmitFinal),
        vec![BackendCall::SubmitFinal {
            form: "fox".into(),
            boundaries: vec![false, false],
            tags: vec![TagKind::Stem],
            contexts: [("c1".to_string(), true)].into_iter().collect(),
        }]
    );
}

#[tokio::test]
async fn test_tagging_and_final_submission() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", true, ["foxes"]))
            .with_word("foxes", vec![false, false, true, false], vec![ctx("c1")]),
    )
    .await;

    session.handle(Gesture::SubmitSegmentation).await.unwrap();
    assert_eq!(session.state(), SessionState::Tagging);
    assert_eq!(session.tag_sheet().unwrap().morphs(), &["fox", "es"]);

    // First morph can not be a suffix
    let rejected = session.handle(Gesture::SelectTag(0, TagKind::Suffix)).await;
    assert!(matches!(
        rejected,
        Err(SessionError::TagNotSelectable { morph: 0, tag: TagKind::Suffix })
    ));

    session.handle(Gesture::SelectTag(1, TagKind::Suffix)).await.unwrap();
    session.handle(Gesture::SubmitFinal).await.unwrap();

    assert_eq!(session.state(), SessionState::Exhausted);
    assert_eq!(completed(&session), 1);
    let finals = backend.calls_of(Operation::SubmitFinal);
    assert!(matches!(
        &finals[..],
        [BackendCall::SubmitFinal { form, tags, .. }] if form == "foxes" && tags == &vec![TagKind::Stem, TagKind::Suffix]
    ));
    assert!(session
        .view()
        .notices
        .contains(&Notice::Completed(SessionConfig::default().strings.done)));
}

#[tokio::test]
async fn test_failed_final_submission_keeps_tags() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", true, ["foxes"]))
            .with_word("foxes", vec![false, false, true, false], vec![ctx("c1")]),
    )
    .await;
    session.submit_segmentation().await.unwrap();
    session.select_tag(1, TagKind::Suffix).unwrap();

    backend.fail(Operation::SubmitFinal);
    assert!(session.submit_final().await.is_err());
    assert_eq!(session.state(), SessionState::Tagging);
    assert_eq!(
        session.tag_sheet().unwrap().tags(),
        &[Some(TagKind::Stem), Some(TagKind::Suffix)]
    );
    assert_eq!(completed(&session), 0);

    backend.recover(Operation::SubmitFinal);
    session.submit_final().await.unwrap();
    assert_eq!(completed(&session), 1);
}

#[tokio::test]
async fn test_reset_audits_every_cleared_boundary() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["foxes"]))
            .with_word("foxes", vec![false, false, true, false], vec![ctx("c1")]),
    )
    .await;

    session.toggle_boundary(0).unwrap();
    session.reset_boundaries().unwrap();
    session.flush().await;

    assert_eq!(session.workspace().unwrap().boundaries(), &[false; 4]);
    assert_eq!(
        backend.calls_of(Operation::AuditBoundaryClick),
        vec![
            BackendCall::AuditBoundaryClick { index: 0 },
            BackendCall::AuditBoundaryClick { index: 0 },
            BackendCall::AuditBoundaryClick { index: 2 },
        ]
    );
    assert_eq!(
        backend.calls_of(Operation::AuditReset),
        vec![BackendCall::AuditReset { form: "foxes".into() }]
    );
}

// =============================================================================
// Failures and retry
// =============================================================================

#[tokio::test]
async fn test_failed_word_fetch_is_retried_manually() {
    let backend = Arc::new(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")]),
    );
    backend.fail(Operation::FetchWord);
    let mut session = controller(&backend);

    let result = session.login(EMAIL).await;
    assert!(matches!(result, Err(SessionError::Backend(_))));
    assert_eq!(session.state(), SessionState::LoadingQueue);
    assert_eq!(session.current_word(), Some("fox"));
    assert_eq!(session.view().errors().len(), 1);
    assert!(session.view().errors()[0].starts_with(&SessionConfig::default().strings.fetch_failed));

    // Still failing: nothing changes
    assert!(session.retry().await.is_err());
    assert_eq!(session.state(), SessionState::LoadingQueue);

    backend.recover(Operation::FetchWord);
    session.handle(Gesture::Retry).await.unwrap();
    assert_eq!(session.state(), SessionState::Segmenting);
    assert_eq!(session.current_word(), Some("fox"));
    assert_eq!(backend.calls_of(Operation::FetchWord).len(), 3);
}

#[tokio::test]
async fn test_failed_login_and_queue_fetch() {
    let backend = Arc::new(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")]),
    );
    backend.fail(Operation::Login);
    backend.fail(Operation::FetchQueue);
    let mut session = controller(&backend);

    assert!(session.login(EMAIL).await.is_err());
    assert_eq!(session.state(), SessionState::Login);

    backend.recover(Operation::Login);
    assert!(session.retry().await.is_err());
    assert_eq!(session.state(), SessionState::LoadingQueue);

    backend.recover(Operation::FetchQueue);
    session.retry().await.unwrap();
    assert_eq!(session.state(), SessionState::Segmenting);
}

#[tokio::test]
async fn test_failed_queue_fetch_after_login_retried_from_run() {
    let backend = Arc::new(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")]),
    );
    backend.fail(Operation::FetchQueue);
    let mut session = controller(&backend);

    // Login itself succeeded; only the queue is missing
    assert!(session.login(EMAIL).await.is_err());
    assert!(session.is_logged_in());
    assert_eq!(session.state(), SessionState::LoadingQueue);

    backend.recover(Operation::FetchQueue);
    let (tx, rx) = mpsc::channel(4);
    tx.send(Gesture::Retry).await.unwrap();
    drop(tx);
    session.run(rx).await;

    assert_eq!(session.state(), SessionState::Segmenting);
    assert_eq!(session.current_word(), Some("fox"));
}

#[tokio::test]
async fn test_failed_login_is_not_logged_in() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.fail(Operation::Login);
    let mut session = controller(&backend);

    assert!(session.login(EMAIL).await.is_err());
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn test_failed_segmentation_leaves_workspace_unchanged() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")]),
    )
    .await;
    session.toggle_boundary(1).unwrap();

    backend.fail(Operation::SubmitSegmentation);
    assert!(session.submit_segmentation().await.is_err());
    assert_eq!(session.state(), SessionState::Segmenting);
    assert_eq!(session.workspace().unwrap().boundaries(), &[false, true]);
}

#[tokio::test]
async fn test_failed_notifications_are_not_fatal() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox", "ox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")])
            .with_word("ox", vec![false], vec![ctx("c2")]),
    )
    .await;
    backend.fail(Operation::AuditBoundaryClick);
    backend.fail(Operation::MarkNoise);

    session.toggle_boundary(0).unwrap();
    session.mark_noise().await.unwrap();
    session.flush().await;

    assert_eq!(session.current_word(), Some("ox"));
    assert!(session.view().errors().is_empty());
}

#[tokio::test]
async fn test_malformed_word_is_rejected() {
    let backend = Arc::new(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["fox", "ox"]))
            .with_word("fox", vec![false], vec![ctx("c1")])
            .with_word("ox", vec![false], vec![ctx("c2")]),
    );
    let mut session = controller(&backend);

    let result = session.login(EMAIL).await;
    assert!(matches!(
        result,
        Err(SessionError::Workspace(WorkspaceError::InvalidShape { expected: 2, actual: 1, .. }))
    ));
    assert!(session.workspace().is_none());
    assert_eq!(session.view().errors().len(), 1);

    // The broken word can still be skipped over
    session.mark_noise().await.unwrap();
    assert_eq!(session.current_word(), Some("ox"));
    assert_eq!(session.state(), SessionState::Segmenting);
}

// =============================================================================
// Phases and the gesture loop
// =============================================================================

#[tokio::test]
async fn test_phase_notice_once_per_phase() {
    let (_, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("First set", false, ["fox", "foxes"]))
            .with_bucket(WordBucket::new("Training words", true, ["ox"]))
            .with_word("fox", vec![false, false], vec![ctx("c1")])
            .with_word("foxes", vec![false; 4], vec![ctx("c2")])
            .with_word("ox", vec![false], vec![ctx("c3")]),
    )
    .await;

    session.mark_noise().await.unwrap();
    session.mark_noise().await.unwrap();
    session.mark_noise().await.unwrap();

    let strings = SessionConfig::default().strings;
    assert_eq!(
        session.view().phase_notices(),
        vec!["First set", "Training words", strings.iter_done.as_str()]
    );
    let first = session.view().notices.iter().find_map(|n| match n {
        Notice::PhaseChanged { text, .. } => Some(text.clone()),
        _ => None,
    });
    assert_eq!(first, Some(format!("{}First set\n\n{}", strings.next_phase, strings.no_pred)));
    assert_eq!(session.state(), SessionState::Exhausted);
}

#[tokio::test]
async fn test_run_processes_gestures_until_exhausted() {
    let (backend, mut session) = start(
        InMemoryBackend::new()
            .with_bucket(WordBucket::new("A", false, ["unfox", "ox"]))
            .with_word("unfox", vec![false; 4], vec![ctx("c1")])
            .with_word("ox", vec![false], vec![ctx("c2")]),
    )
    .await;

    let (tx, rx) = mpsc::channel(16);
    for line in ["t 1", "ok", "tag 0 PRE", "done", "t 9", "n"] {
        tx.send(line.parse::<Gesture>().unwrap()).await.unwrap();
    }
    drop(tx);

    session.run(rx).await;

    assert_eq!(session.state(), SessionState::Exhausted);
    assert_eq!(completed(&session), 1);
    let finals = backend.calls_of(Operation::SubmitFinal);
    assert!(matches!(
        &finals[..],
        [BackendCall::SubmitFinal { form, tags, .. }] if form == "unfox" && tags == &vec![TagKind::Prefix, TagKind::Stem]
    ));
    // "t 9" was out of range for "ox"
    assert_eq!(session.view().errors().len(), 1);
    assert!(backend.calls_of(Operation::MarkNoise).len() == 1);
}

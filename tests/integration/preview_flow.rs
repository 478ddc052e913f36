//! End-to-end preview behavior through the tokio runtime
//!
//! Each test spawns a preview task with a recording DOM surface and feeds it
//! events the way the runner would.

use std::time::Duration;

use super::common::fixtures::{
    frame_body, live_dom, snapshot_request, TestPreview, LIVE_BODY, LIVE_URL,
};
use snapshot_preview::{DomOp, MessageType, PreviewEvent, PreviewPhase, RequestId};

/// Reset clears everything regardless of what was in flight
#[tokio::test(start_paused = true)]
async fn test_run_start_end_resets_from_any_state() {
    let preview = TestPreview::spawn();
    preview
        .handle
        .send(PreviewEvent::ShowSnapshot(snapshot_request(1, &["a", "b", "c"])));
    preview
        .handle
        .send(PreviewEvent::PinSnapshot(snapshot_request(1, &["a", "b", "c"])));
    preview.handle.send(PreviewEvent::RunStart);
    preview.handle.send(PreviewEvent::RunEnd);
    preview.handle.flush().await.unwrap();

    let ops_after_reset = preview.surface.ops().len();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(preview.surface.ops().len(), ops_after_reset, "no cycle survives a reset");

    let state = preview.view.get();
    assert!(!state.is_running);
    assert!(state.message.is_empty());

    let controller = preview.finish().await;
    assert!(!controller.is_pinned());
    assert!(!controller.is_cycling());
    assert!(controller.original_state().is_none());
    assert_eq!(controller.phase(), PreviewPhase::Live);
}

/// One frame renders once, immediately, without a timer
#[tokio::test(start_paused = true)]
async fn test_single_frame_renders_once() {
    let preview = TestPreview::spawn();
    preview
        .handle
        .send(PreviewEvent::ShowSnapshot(snapshot_request(1, &["click"])));
    preview.handle.flush().await.unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(preview.restored_bodies(), vec![frame_body("click")]);
    let state = preview.view.get();
    assert_eq!(state.message.title.as_deref(), Some("DOM Snapshot"));
    assert_eq!(state.message.description.as_deref(), Some("click"));

    let controller = preview.finish().await;
    assert!(!controller.is_cycling());
}

/// Frame k mod N is on screen after k intervals
#[tokio::test(start_paused = true)]
async fn test_cycle_follows_elapsed_time() {
    let preview = TestPreview::spawn();
    let names = ["before", "during", "after", "final"];
    preview
        .handle
        .send(PreviewEvent::ShowSnapshot(snapshot_request(3, &names)));
    preview.handle.flush().await.unwrap();
    let shown_at = tokio::time::Instant::now();

    assert_eq!(preview.surface.current().body, frame_body("before"));

    for k in 1..=9u32 {
        let due = shown_at + Duration::from_millis(800) * k;
        tokio::time::sleep_until(due + Duration::from_millis(5)).await;
        let expected = names[k as usize % names.len()];
        assert_eq!(preview.surface.current().body, frame_body(expected), "after {k} ticks");
        assert_eq!(
            preview.view.get().message.description.as_deref(),
            Some(expected)
        );
    }
}

/// Absent or empty frame lists degrade to a warning
#[tokio::test]
async fn test_missing_snapshot_warns() {
    let preview = TestPreview::spawn();
    let mut request = snapshot_request(1, &[]);
    preview.handle.send(PreviewEvent::ShowSnapshot(request.clone()));
    request.snapshots = None;
    preview.handle.send(PreviewEvent::ShowSnapshot(request));
    preview.handle.flush().await.unwrap();

    assert!(preview.restored_bodies().is_empty());
    let state = preview.view.get();
    assert_eq!(state.message.kind, MessageType::Warning);
    assert_eq!(
        state.message.title.as_deref(),
        Some("The snapshot is missing. Displaying current state of the DOM.")
    );
}

/// show(1), hide, show(2) in one burst never flashes the live page
#[tokio::test]
async fn test_hide_superseded_by_show() {
    let preview = TestPreview::spawn();
    preview
        .handle
        .send(PreviewEvent::ShowSnapshot(snapshot_request(1, &["first"])));
    preview.handle.send(PreviewEvent::HideSnapshot);
    preview
        .handle
        .send(PreviewEvent::ShowSnapshot(snapshot_request(2, &["second"])));
    preview.handle.flush().await.unwrap();

    assert_eq!(
        preview.restored_bodies(),
        vec![frame_body("first"), frame_body("second")]
    );
    assert_eq!(preview.surface.current().body, frame_body("second"));

    let controller = preview.finish().await;
    assert_eq!(controller.detached_id(), Some(RequestId(2)));
    assert_eq!(controller.original_state().unwrap().dom, live_dom());
}

/// show, hide, then quiet: the live page comes back exactly once
#[tokio::test]
async fn test_hide_restores_live_page() {
    let preview = TestPreview::spawn();
    preview
        .handle
        .send(PreviewEvent::ShowSnapshot(snapshot_request(1, &["a", "b"])));
    preview.handle.flush().await.unwrap();
    preview.handle.send(PreviewEvent::HideSnapshot);
    preview.handle.flush().await.unwrap();

    let live_restores = preview
        .restored_bodies()
        .into_iter()
        .filter(|body| body == LIVE_BODY)
        .count();
    assert_eq!(live_restores, 1);
    assert_eq!(preview.surface.current(), live_dom());

    let state = preview.view.get();
    assert_eq!(state.url, LIVE_URL);
    assert_eq!((state.width, state.height), (1000, 660));
    assert!(!state.highlight_url);
    assert!(state.message.is_empty());

    let controller = preview.finish().await;
    assert!(controller.original_state().is_none());
    assert!(controller.detached_id().is_none());
}

/// While pinned only unpin changes anything
#[tokio::test(start_paused = true)]
async fn test_pin_freezes_until_unpin() {
    let preview = TestPreview::spawn();
    let request = snapshot_request(5, &["before", "after"]);
    preview.handle.send(PreviewEvent::ShowSnapshot(request.clone()));
    preview.handle.send(PreviewEvent::PinSnapshot(request));
    preview.handle.flush().await.unwrap();

    let pinned_state = preview.view.get();
    assert_eq!(
        pinned_state.message.title.as_deref(),
        Some("DOM Snapshot (pinned)")
    );
    assert!(pinned_state.message.controls.is_some());
    let ops_when_pinned = preview.surface.ops();

    preview
        .handle
        .send(PreviewEvent::ShowSnapshot(snapshot_request(6, &["other"])));
    preview.handle.send(PreviewEvent::HideSnapshot);
    preview.handle.flush().await.unwrap();
    tokio::time::sleep(Duration::from_secs(4)).await;

    assert_eq!(preview.surface.ops(), ops_when_pinned);
    assert_eq!(preview.view.get().message, pinned_state.message);

    preview.handle.send(PreviewEvent::UnpinSnapshot);
    preview.handle.flush().await.unwrap();

    assert_eq!(preview.surface.current(), live_dom());
    let state = preview.view.get();
    assert!(state.message.is_empty());
    assert!(state.snapshot.showing_highlights);
}

/// A show during a run only changes the banner
#[tokio::test]
async fn test_running_guard() {
    let preview = TestPreview::spawn();
    preview.handle.send(PreviewEvent::RunStart);
    preview.handle.flush().await.unwrap();
    let before = preview.view.get();

    preview
        .handle
        .send(PreviewEvent::ShowSnapshot(snapshot_request(1, &["a", "b"])));
    preview.handle.flush().await.unwrap();

    let after = preview.view.get();
    assert_eq!(after.url, before.url);
    assert_eq!((after.width, after.height), (before.width, before.height));
    assert_eq!(after.message.kind, MessageType::Warning);
    assert!(preview.surface.ops().is_empty());
}

/// Highlights target the selector of the request on every frame shown
#[tokio::test]
async fn test_highlight_invoked_with_target() {
    let preview = TestPreview::spawn();
    let mut request = snapshot_request(8, &["type"]);
    request.target_selector = Some("input[name=email]".to_string());
    preview.handle.send(PreviewEvent::ShowSnapshot(request));
    preview.handle.flush().await.unwrap();

    assert!(preview.surface.ops().contains(&DomOp::Highlight {
        frame: Some("type".to_string()),
        selector: "input[name=email]".to_string(),
    }));
}

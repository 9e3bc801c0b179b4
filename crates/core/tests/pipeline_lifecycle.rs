//! Merge pipeline lifecycle integration tests.
//!
//! These tests drive `MergePipeline` end to end with mock collaborators:
//! - Source ordering through download and manifest
//! - Stream copy with re-encode fallback
//! - Workspace cleanup on every path
//! - Output naming

use std::sync::Arc;

use reelmerge_core::{
    pipeline::{MergePipeline, PipelineError, PipelineStage, ValidationError},
    testing::{
        MockCommandRunner, MockFetcher, MockObjectStore, MockWorkspaceManager, MERGED_BYTES,
    },
    MergeStrategy, SIGNED_URL_TTL,
};

/// Test helper wiring a pipeline to mocks.
struct TestHarness {
    pipeline: MergePipeline,
    fetcher: Arc<MockFetcher>,
    workspaces: Arc<MockWorkspaceManager>,
    runner: Arc<MockCommandRunner>,
    store: Arc<MockObjectStore>,
}

impl TestHarness {
    fn new() -> Self {
        let fetcher = Arc::new(MockFetcher::new());
        let workspaces = Arc::new(MockWorkspaceManager::new());
        let runner = Arc::new(MockCommandRunner::new());
        let store = Arc::new(MockObjectStore::new());

        let pipeline = MergePipeline::new(
            fetcher.clone(),
            workspaces.clone(),
            runner.clone(),
            store.clone(),
        );

        Self {
            pipeline,
            fetcher,
            workspaces,
            runner,
            store,
        }
    }
}

fn sources(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| u.to_string()).collect()
}

fn manifest_arg(call: &[String]) -> String {
    let i = call.iter().position(|a| a == "-i").expect("no -i argument");
    call[i + 1].clone()
}

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn test_merge_with_explicit_output_name() {
    let h = TestHarness::new();

    let outcome = h
        .pipeline
        .handle(
            sources(&["https://cdn.example.com/a.mp4", "https://cdn.example.com/b.mp4"]),
            Some("out.mp4".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(outcome.output_name, "out.mp4");
    assert_eq!(outcome.strategy, MergeStrategy::StreamCopy);
    assert!(outcome.url.contains("out.mp4"));

    let uploads = h.store.recorded_uploads().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].object_name, "out.mp4");
    assert_eq!(h.store.object("out.mp4").await.unwrap(), MERGED_BYTES);
    assert_eq!(h.store.signed_ttls().await, vec![SIGNED_URL_TTL]);
}

#[tokio::test]
async fn test_default_output_name() {
    let h = TestHarness::new();

    let outcome = h
        .pipeline
        .handle(sources(&["https://cdn.example.com/a.mp4"]), None)
        .await
        .unwrap();

    let digits = outcome
        .output_name
        .strip_prefix("merged-")
        .and_then(|rest| rest.strip_suffix(".mp4"))
        .expect("unexpected default name shape");
    assert!(!digits.is_empty());
    assert!(digits.chars().all(|c| c.is_ascii_digit()));

    let uploads = h.store.recorded_uploads().await;
    assert_eq!(uploads[0].object_name, outcome.output_name);
}

#[tokio::test]
async fn test_output_name_matching_workspace_files_does_not_clobber_them() {
    for name in ["input-0.mp4", "list.txt"] {
        let h = TestHarness::new();

        let outcome = h
            .pipeline
            .handle(
                sources(&["https://cdn.example.com/a.mp4", "https://cdn.example.com/b.mp4"]),
                Some(name.to_string()),
            )
            .await
            .unwrap();

        assert_eq!(outcome.output_name, name);

        let calls = h.runner.recorded_calls().await;
        let output = calls[0].last().unwrap().clone();
        let workspace = h.workspaces.created_paths().await[0].clone();
        for reserved in ["input-0.mp4", "input-1.mp4", "list.txt"] {
            assert_ne!(output, workspace.join(reserved).to_str().unwrap());
        }
        assert_ne!(output, manifest_arg(&calls[0]));

        let uploads = h.store.recorded_uploads().await;
        assert_eq!(uploads[0].object_name, name);
        assert_eq!(uploads[0].local_path.to_str().unwrap(), output);
        assert_eq!(h.store.object(name).await.unwrap(), MERGED_BYTES);
    }
}

#[tokio::test]
async fn test_sources_downloaded_and_listed_in_order() {
    let h = TestHarness::new();
    let urls = [
        "https://cdn.example.com/3.mp4",
        "https://cdn.example.com/1.mp4",
        "https://cdn.example.com/2.mp4",
    ];

    h.pipeline
        .handle(sources(&urls), Some("out.mp4".to_string()))
        .await
        .unwrap();

    let fetched: Vec<String> = h
        .fetcher
        .recorded_fetches()
        .await
        .iter()
        .map(|u| u.to_string())
        .collect();
    assert_eq!(fetched, urls);

    // The workspace is gone by now, so check the paths ffmpeg was pointed at.
    let calls = h.runner.recorded_calls().await;
    let manifest = manifest_arg(&calls[0]);
    assert!(manifest.ends_with("list.txt"));
    let workspace = h.workspaces.created_paths().await[0].clone();
    assert!(manifest.starts_with(workspace.to_str().unwrap()));
}

// =============================================================================
// Merge fallback
// =============================================================================

#[tokio::test]
async fn test_stream_copy_success_skips_reencode() {
    let h = TestHarness::new();

    h.pipeline
        .handle(sources(&["https://cdn.example.com/a.mp4"]), None)
        .await
        .unwrap();

    let calls = h.runner.recorded_calls().await;
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains(&"copy".to_string()));
}

#[tokio::test]
async fn test_stream_copy_failure_falls_back_once() {
    let h = TestHarness::new();
    h.runner.fail_next(1).await;

    let outcome = h
        .pipeline
        .handle(sources(&["https://cdn.example.com/a.mp4"]), None)
        .await
        .unwrap();

    assert_eq!(outcome.strategy, MergeStrategy::Reencode);
    let calls = h.runner.recorded_calls().await;
    assert_eq!(calls.len(), 2);
    assert!(calls[1].contains(&"libx264".to_string()));
    assert!(calls[1].contains(&"aac".to_string()));
    assert_eq!(h.store.recorded_uploads().await.len(), 1);
}

#[tokio::test]
async fn test_both_merge_attempts_fail() {
    let h = TestHarness::new();
    h.runner.fail_next(2).await;

    let err = h
        .pipeline
        .handle(sources(&["https://cdn.example.com/a.mp4"]), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Merge(_)));
    assert_eq!(err.stage(), PipelineStage::Merging);
    assert_eq!(h.runner.call_count().await, 2);
    assert!(h.store.recorded_uploads().await.is_empty());
    assert_eq!(h.workspaces.live_count().await, 0);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_zero_sources_rejected_without_side_effects() {
    let h = TestHarness::new();

    let err = h.pipeline.handle(Vec::new(), None).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Validation(ValidationError::NoSources)
    ));
    assert!(err.is_client_error());
    assert!(h.workspaces.created_paths().await.is_empty());
    assert_eq!(h.fetcher.fetch_count().await, 0);
    assert_eq!(h.runner.call_count().await, 0);
}

#[tokio::test]
async fn test_invalid_source_rejected() {
    let h = TestHarness::new();

    let err = h
        .pipeline
        .handle(sources(&["https://cdn.example.com/a.mp4", "not a url"]), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Validation(ValidationError::InvalidSource { index: 1, .. })
    ));
    assert!(h.workspaces.created_paths().await.is_empty());
}

#[tokio::test]
async fn test_unsafe_output_name_rejected() {
    let h = TestHarness::new();

    let err = h
        .pipeline
        .handle(
            sources(&["https://cdn.example.com/a.mp4"]),
            Some("../escape.mp4".to_string()),
        )
        .await
        .unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(h.fetcher.fetch_count().await, 0);
}

// =============================================================================
// Failures and cleanup
// =============================================================================

#[tokio::test]
async fn test_download_failure_stops_before_manifest() {
    let h = TestHarness::new();
    h.fetcher
        .fail_url("https://cdn.example.com/b.mp4", 404)
        .await;

    let err = h
        .pipeline
        .handle(
            sources(&[
                "https://cdn.example.com/a.mp4",
                "https://cdn.example.com/b.mp4",
                "https://cdn.example.com/c.mp4",
            ]),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Download(_)));
    assert_eq!(err.stage(), PipelineStage::Fetching);
    assert!(err.to_string().contains("404"));
    // Third source is never requested.
    assert_eq!(h.fetcher.fetch_count().await, 2);
    assert_eq!(h.runner.call_count().await, 0);
    assert_eq!(h.workspaces.destroyed_paths().await.len(), 1);
}

#[tokio::test]
async fn test_cleanup_runs_once_on_success() {
    let h = TestHarness::new();

    h.pipeline
        .handle(sources(&["https://cdn.example.com/a.mp4"]), None)
        .await
        .unwrap();

    let created = h.workspaces.created_paths().await;
    assert_eq!(created.len(), 1);
    assert_eq!(h.workspaces.destroyed_paths().await, created);
    assert!(!created[0].exists());
}

#[tokio::test]
async fn test_cleanup_runs_once_on_failure() {
    let h = TestHarness::new();
    h.store.set_fail_upload(true).await;

    let err = h
        .pipeline
        .handle(sources(&["https://cdn.example.com/a.mp4"]), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Upload(_)));
    assert_eq!(h.workspaces.destroyed_paths().await.len(), 1);
    assert_eq!(h.workspaces.live_count().await, 0);
}

#[tokio::test]
async fn test_cleanup_failure_does_not_change_outcome() {
    let h = TestHarness::new();
    h.workspaces.set_fail_destroy(true).await;

    let outcome = h
        .pipeline
        .handle(
            sources(&["https://cdn.example.com/a.mp4"]),
            Some("out.mp4".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(outcome.output_name, "out.mp4");
    assert_eq!(h.workspaces.destroyed_paths().await.len(), 1);
}

#[tokio::test]
async fn test_signing_failure_after_upload() {
    let h = TestHarness::new();
    h.store.set_fail_signing(true).await;

    let err = h
        .pipeline
        .handle(sources(&["https://cdn.example.com/a.mp4"]), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Signing(_)));
    assert_eq!(h.store.recorded_uploads().await.len(), 1);
}

#[tokio::test]
async fn test_workspace_failure_skips_everything() {
    let h = TestHarness::new();
    h.workspaces.set_fail_create(true).await;

    let err = h
        .pipeline
        .handle(sources(&["https://cdn.example.com/a.mp4"]), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Workspace(_)));
    assert!(!err.is_client_error());
    assert_eq!(h.fetcher.fetch_count().await, 0);
    assert!(h.workspaces.destroyed_paths().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_requests_use_separate_workspaces() {
    let h = Arc::new(TestHarness::new());

    let mut handles = Vec::new();
    for i in 0..4 {
        let h = h.clone();
        handles.push(tokio::spawn(async move {
            h.pipeline
                .handle(
                    sources(&["https://cdn.example.com/a.mp4"]),
                    Some(format!("out-{}.mp4", i)),
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut created = h.workspaces.created_paths().await;
    created.sort();
    created.dedup();
    assert_eq!(created.len(), 4);
    assert_eq!(h.workspaces.live_count().await, 0);
    assert_eq!(h.store.recorded_uploads().await.len(), 4);
}

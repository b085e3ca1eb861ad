//! Progressive delivery tests.
//!
//! The batched sequence must be finite, forward-only, URL-disjoint across
//! batches, terminate with exactly one `is_complete = true`, and stop
//! cooperatively on cancellation.

use std::collections::HashSet;
use std::sync::Arc;

use fixit_core::{
    testing::{fixtures, MockProvider},
    CacheConfig, DedupConfig, OrchestratorConfig, ProviderError, RequestDeduplicator,
    ResultCache, SearchOrchestrator,
};

fn make_orchestrator(provider: Arc<MockProvider>) -> SearchOrchestrator {
    SearchOrchestrator::new(
        provider as Arc<dyn fixit_core::SearchProvider>,
        Arc::new(ResultCache::new(&CacheConfig::default())),
        Arc::new(RequestDeduplicator::new(&DedupConfig::default())),
        OrchestratorConfig::default(),
    )
}

async fn seeded_provider() -> Arc<MockProvider> {
    let provider = Arc::new(MockProvider::new());
    provider
        .set_query_handler(|query| {
            if query.contains("how to") {
                Some(vec![
                    fixtures::article_candidate("fix-leaky-faucet", "Fix a Leaky Faucet"),
                    fixtures::video_candidate("abc123", "Fix a Leaky Faucet Fast"),
                    fixtures::article_candidate("faucet-cartridge", "Replace a Faucet Cartridge"),
                    fixtures::article_candidate("faucet-washer", "Swap a Faucet Washer"),
                ])
            } else {
                Some(vec![
                    fixtures::visual_candidate("991", "Leaky Faucet Repair Photos"),
                    fixtures::article_candidate("faucet-aerator", "Clean a Faucet Aerator"),
                    fixtures::video_candidate("def456", "Faucet Fix for Beginners"),
                ])
            }
        })
        .await;
    provider
}

#[tokio::test]
async fn test_batches_are_disjoint_and_terminate_once() {
    let provider = seeded_provider().await;
    let orchestrator = make_orchestrator(provider);

    let options = fixtures::tutorial_options("fix leaky faucet");
    let mut progressive = orchestrator.search_progressive(options);

    let mut batches = Vec::new();
    while let Some(batch) = progressive.next_batch().await {
        batches.push(batch);
    }

    assert!(!batches.is_empty());

    // Exactly one terminal batch, and it is the last one.
    let complete_count = batches.iter().filter(|b| b.is_complete).count();
    assert_eq!(complete_count, 1);
    assert!(batches.last().unwrap().is_complete);

    // Batch indices are sequential.
    for (i, batch) in batches.iter().enumerate() {
        assert_eq!(batch.batch_index, i);
    }

    // Union of all batches is URL-disjoint and within the target.
    let mut seen = HashSet::new();
    for batch in &batches {
        for result in &batch.results {
            assert!(seen.insert(result.url.clone()), "duplicate {}", result.url);
        }
    }
    assert!(seen.len() <= 5);
}

#[tokio::test]
async fn test_progressive_respects_num_results() {
    let provider = seeded_provider().await;
    let orchestrator = make_orchestrator(provider);

    let mut options = fixtures::tutorial_options("fix leaky faucet");
    options.num_results = 4;
    options.progressive = true;
    let mut progressive = orchestrator.search_progressive(options);

    let mut total = 0;
    while let Some(batch) = progressive.next_batch().await {
        total += batch.results.len();
    }
    assert!(total <= 4);
}

#[tokio::test]
async fn test_sequence_not_restartable() {
    let provider = seeded_provider().await;
    let orchestrator = make_orchestrator(provider);

    let mut progressive =
        orchestrator.search_progressive(fixtures::tutorial_options("fix leaky faucet"));

    while progressive.next_batch().await.is_some() {}

    // Once terminated, the sequence stays terminated.
    assert!(progressive.next_batch().await.is_none());
    assert!(progressive.next_batch().await.is_none());
}

#[tokio::test]
async fn test_cancellation_stops_batches() {
    let provider = seeded_provider().await;
    let orchestrator = make_orchestrator(provider);

    let mut progressive =
        orchestrator.search_progressive(fixtures::tutorial_options("fix leaky faucet"));

    let first = progressive.next_batch().await;
    assert!(first.is_some());

    progressive.cancel();
    assert!(progressive.next_batch().await.is_none());
}

#[tokio::test]
async fn test_cancel_handle_works_from_clone() {
    let provider = seeded_provider().await;
    let orchestrator = make_orchestrator(provider);

    let mut progressive =
        orchestrator.search_progressive(fixtures::tutorial_options("fix leaky faucet"));
    let handle = progressive.cancel_handle();

    handle.cancel();
    assert!(progressive.next_batch().await.is_none());
}

#[tokio::test]
async fn test_internal_error_yields_one_empty_terminal_batch() {
    let provider = Arc::new(MockProvider::new());
    provider
        .set_persistent_error(ProviderError::ApiError("down".to_string()))
        .await;
    let orchestrator = make_orchestrator(provider);

    let mut progressive =
        orchestrator.search_progressive(fixtures::tutorial_options("fix leaky faucet"));

    let batch = progressive.next_batch().await.unwrap();
    assert!(batch.results.is_empty());
    assert!(batch.is_complete);

    assert!(progressive.next_batch().await.is_none());
}

#[tokio::test]
async fn test_batch_metadata_is_consistent() {
    let provider = seeded_provider().await;
    let orchestrator = make_orchestrator(provider);

    let mut options = fixtures::tutorial_options("fix leaky faucet");
    options.num_results = 5;
    let mut progressive = orchestrator.search_progressive(options);

    while let Some(batch) = progressive.next_batch().await {
        // batch_size 3, num_results 5 -> ceil(5/3) = 2 planned batches.
        assert_eq!(batch.total_batches, 2);
        assert_eq!(batch.batch_size, 3);
        assert!(batch.results.len() <= batch.batch_size);
    }
}

//! Service-level integration tests against an in-memory store

mod support;

use std::sync::Arc;

use serde_json::{Map, json};

use domain_points::{
    EmbedderRegistry, ExtractionPolicy, PointError, PointService, QueryPoints, SearchPoints,
    UpsertPoint, models::DEFAULT_EMBEDDING_MODEL,
};
use support::{EchoExtractor, FailingExtractor, MemoryStore, StaticEmbedder};
use test_utils::TestDataBuilder;

fn direct_upsert(id: &str, embedding: Vec<f32>) -> UpsertPoint {
    UpsertPoint {
        id: Some(id.to_string()),
        input: None,
        embedding: Some(embedding),
        metadata: Map::new(),
        model: DEFAULT_EMBEDDING_MODEL.to_string(),
    }
}

#[tokio::test]
async fn test_upsert_then_get_round_trip() {
    let store = MemoryStore::new().with_collection("documents", 3);
    let service = PointService::new(store);

    let mut metadata = Map::new();
    metadata.insert("title".to_string(), json!("release notes"));
    let input = UpsertPoint {
        metadata,
        ..direct_upsert("doc-1", vec![0.1, 0.2, 0.3])
    };

    let stored = service.upsert_direct("documents", input).await.unwrap();
    let fetched = service.get("documents", "doc-1").await.unwrap();

    assert_eq!(fetched.id, stored.id);
    assert_eq!(fetched.embedding, vec![0.1, 0.2, 0.3]);
    assert_eq!(fetched.metadata.get("title"), Some(&json!("release notes")));
}

#[tokio::test]
async fn test_dimension_mismatch_leaves_store_untouched() {
    let store = MemoryStore::new().with_collection("documents", 4);
    let service = PointService::new(store);

    let err = service
        .upsert_direct("documents", direct_upsert("doc-1", vec![0.1, 0.2, 0.3]))
        .await
        .unwrap_err();
    assert!(matches!(err, PointError::DimensionMismatch(_)));

    let err = service.get("documents", "doc-1").await.unwrap_err();
    assert!(matches!(err, PointError::PointNotFound(_)));
}

#[tokio::test]
async fn test_upsert_replaces_existing_point() {
    let store = MemoryStore::new().with_collection("documents", 3);
    let service = PointService::new(store);

    service
        .upsert_direct("documents", direct_upsert("doc-1", vec![0.1, 0.2, 0.3]))
        .await
        .unwrap();
    service
        .upsert_direct("documents", direct_upsert("doc-1", vec![0.9, 0.8, 0.7]))
        .await
        .unwrap();

    let fetched = service.get("documents", "doc-1").await.unwrap();
    assert_eq!(fetched.embedding, vec![0.9, 0.8, 0.7]);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let store = MemoryStore::new().with_collection("documents", 3);
    let service = PointService::new(store);

    service
        .upsert_direct("documents", direct_upsert("doc-1", vec![0.1, 0.2, 0.3]))
        .await
        .unwrap();
    service.delete("documents", "doc-1").await.unwrap();

    let err = service.get("documents", "doc-1").await.unwrap_err();
    assert!(matches!(err, PointError::PointNotFound(id) if id == "doc-1"));

    // Deleting an absent id stays successful
    service.delete("documents", "doc-1").await.unwrap();
}

#[tokio::test]
async fn test_concurrent_upserts_all_land() {
    let builder = TestDataBuilder::from_test_name("concurrent_upserts");
    let store = MemoryStore::new().with_collection("documents", 8);
    let service = PointService::new(store);

    let mut handles = Vec::new();
    for n in 0..100u64 {
        let service = service.clone();
        let id = builder.point_id(n);
        let embedding = builder.embedding(n, 8);
        handles.push(tokio::spawn(async move {
            service
                .upsert_direct("documents", direct_upsert(&id, embedding))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for n in 0..100u64 {
        let id = builder.point_id(n);
        let fetched = service.get("documents", &id).await.unwrap();
        assert_eq!(fetched.embedding, builder.embedding(n, 8));
    }
}

#[tokio::test]
async fn test_query_returns_ranked_list_with_top_k() {
    let store = MemoryStore::new().with_collection("documents", 2);
    let service = PointService::new(store);

    service
        .upsert_direct("documents", direct_upsert("near", vec![1.0, 0.0]))
        .await
        .unwrap();
    service
        .upsert_direct("documents", direct_upsert("mid", vec![0.5, 0.5]))
        .await
        .unwrap();
    service
        .upsert_direct("documents", direct_upsert("far", vec![0.0, 1.0]))
        .await
        .unwrap();

    let results = service
        .query(
            "documents",
            QueryPoints {
                query: vec![1.0, 0.0],
                top_k: 2,
                filter: None,
            },
        )
        .await
        .unwrap();

    let ids: Vec<_> = results.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["near", "mid"]);
    assert!(results[0].score >= results[1].score);
}

#[tokio::test]
async fn test_query_filter_restricts_candidates() {
    let store = MemoryStore::new().with_collection("documents", 2);
    let service = PointService::new(store);

    let mut tagged = Map::new();
    tagged.insert("source".to_string(), json!("docs"));
    service
        .upsert_direct(
            "documents",
            UpsertPoint {
                metadata: tagged,
                ..direct_upsert("tagged", vec![0.1, 0.0])
            },
        )
        .await
        .unwrap();
    service
        .upsert_direct("documents", direct_upsert("untagged", vec![1.0, 0.0]))
        .await
        .unwrap();

    let results = service
        .query(
            "documents",
            QueryPoints {
                query: vec![1.0, 0.0],
                top_k: 10,
                filter: Some(json!({"source": "docs"})),
            },
        )
        .await
        .unwrap();

    let ids: Vec<_> = results.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["tagged"]);
}

#[tokio::test]
async fn test_search_end_to_end_picks_best_match() {
    let store = MemoryStore::new().with_collection("documents", 2);
    let service = PointService::new(store).with_embedders(
        EmbedderRegistry::new().with(Arc::new(StaticEmbedder::new(
            DEFAULT_EMBEDDING_MODEL,
            vec![1.0, 0.0],
        ))),
    );

    service
        .upsert_direct("documents", direct_upsert("near", vec![0.9, 0.1]))
        .await
        .unwrap();
    service
        .upsert_direct("documents", direct_upsert("far", vec![0.1, 0.9]))
        .await
        .unwrap();

    let best = service
        .search(
            "documents",
            SearchPoints {
                input: "which document is closest".to_string(),
                top_k: 10,
                filter: None,
                model: DEFAULT_EMBEDDING_MODEL.to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(best, "near");
}

#[tokio::test]
async fn test_search_empty_collection_is_no_match() {
    let store = MemoryStore::new().with_collection("documents", 2);
    let service = PointService::new(store).with_embedders(
        EmbedderRegistry::new().with(Arc::new(StaticEmbedder::new(
            DEFAULT_EMBEDDING_MODEL,
            vec![1.0, 0.0],
        ))),
    );

    let err = service
        .search(
            "documents",
            SearchPoints {
                input: "anything".to_string(),
                top_k: 10,
                filter: None,
                model: DEFAULT_EMBEDDING_MODEL.to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PointError::NoMatch));
}

#[tokio::test]
async fn test_upsert_with_extraction_stage_runs() {
    let store = MemoryStore::new().with_collection("documents", 2);
    let service = PointService::new(store)
        .with_embedders(
            EmbedderRegistry::new().with(Arc::new(StaticEmbedder::new(
                DEFAULT_EMBEDDING_MODEL,
                vec![0.5, 0.5],
            ))),
        )
        .with_extractor(Arc::new(EchoExtractor));

    let input = UpsertPoint {
        id: Some("doc-1".to_string()),
        input: Some("a long document body".to_string()),
        embedding: None,
        metadata: Map::new(),
        model: DEFAULT_EMBEDDING_MODEL.to_string(),
    };
    let stored = service
        .upsert_with_extraction("documents", input)
        .await
        .unwrap();

    assert_eq!(stored.embedding, vec![0.5, 0.5]);
}

#[tokio::test]
async fn test_extraction_fallback_policy_end_to_end() {
    let store = MemoryStore::new().with_collection("documents", 2);
    let service = PointService::new(store)
        .with_embedders(
            EmbedderRegistry::new().with(Arc::new(StaticEmbedder::new(
                DEFAULT_EMBEDDING_MODEL,
                vec![0.5, 0.5],
            ))),
        )
        .with_extractor(Arc::new(FailingExtractor))
        .with_extraction_policy(ExtractionPolicy::FallbackToInput);

    let input = UpsertPoint {
        id: Some("doc-1".to_string()),
        input: Some("body text".to_string()),
        embedding: None,
        metadata: Map::new(),
        model: DEFAULT_EMBEDDING_MODEL.to_string(),
    };
    service
        .upsert_with_extraction("documents", input)
        .await
        .unwrap();

    let fetched = service.get("documents", "doc-1").await.unwrap();
    assert_eq!(fetched.embedding, vec![0.5, 0.5]);
}

#[tokio::test]
async fn test_extraction_fail_policy_end_to_end() {
    let store = MemoryStore::new().with_collection("documents", 2);
    let service = PointService::new(store)
        .with_embedders(
            EmbedderRegistry::new().with(Arc::new(StaticEmbedder::new(
                DEFAULT_EMBEDDING_MODEL,
                vec![0.5, 0.5],
            ))),
        )
        .with_extractor(Arc::new(FailingExtractor))
        .with_extraction_policy(ExtractionPolicy::Fail);

    let input = UpsertPoint {
        id: Some("doc-1".to_string()),
        input: Some("body text".to_string()),
        embedding: None,
        metadata: Map::new(),
        model: DEFAULT_EMBEDDING_MODEL.to_string(),
    };
    let err = service
        .upsert_with_extraction("documents", input)
        .await
        .unwrap_err();

    assert!(matches!(err, PointError::Extraction(_)));
    let err = service.get("documents", "doc-1").await.unwrap_err();
    assert!(matches!(err, PointError::PointNotFound(_)));
}

#[tokio::test]
async fn test_unknown_collection_across_operations() {
    let service = PointService::new(MemoryStore::new());

    let err = service
        .upsert_direct("missing", direct_upsert("p1", vec![0.1]))
        .await
        .unwrap_err();
    assert!(matches!(err, PointError::CollectionNotFound(_)));

    let err = service.delete("missing", "p1").await.unwrap_err();
    assert!(matches!(err, PointError::CollectionNotFound(_)));

    let err = service
        .query(
            "missing",
            QueryPoints {
                query: vec![0.1],
                top_k: 10,
                filter: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PointError::CollectionNotFound(_)));
}

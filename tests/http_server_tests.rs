mod common;

use anyhow::Result;
use common::test_context;
use ingredient_suggest::server::{build_router, cors_layer};
use ingredient_suggest::suggest::SuggestionResponse;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_suggestions_over_tcp() -> Result<()> {
    let dir = TempDir::new()?;
    let ctx = test_context(&dir)?;
    let app = build_router(Arc::new(ctx), cors_layer(&["*".to_string()])?);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/sugestoes", addr))
        .query(&[("termo", "tomate")])
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: SuggestionResponse = response.json().await?;
    assert_eq!(body.term, "tomate");
    assert_eq!(body.suggestions[0], "tomate");
    assert_eq!(body.count, body.suggestions.len());

    let response = client
        .get(format!("http://{}/sugestoes?termo=x", addr))
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);

    server.abort();
    Ok(())
}

#[tokio::test]
async fn test_concurrent_queries_agree() -> Result<()> {
    let dir = TempDir::new()?;
    let ctx = test_context(&dir)?;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.suggest("leite".to_string()).await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await??);
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(results[0].suggestions[0], "leite");
    Ok(())
}

#[tokio::test]
async fn test_reopened_store_skips_ingestion() -> Result<()> {
    use ingredient_suggest::ingestion::{ingest_if_empty, IngestionOutcome, COLLECTION_NAME};
    use ingredient_suggest::search::{DistanceMetric, VectorStore};

    let dir = TempDir::new()?;
    let first = test_context(&dir)?;
    let before = first.suggest("arroz".to_string()).await?;
    drop(first);

    let store = VectorStore::open(dir.path())?;
    let mut collection = store.get_or_create_collection(COLLECTION_NAME, DistanceMetric::Cosine)?;
    let outcome = ingest_if_empty(&mut collection, &common::TrigramEncoder, || {
        panic!("catalog must not be read when the index is populated")
    })?;
    assert_eq!(outcome, IngestionOutcome::Skipped { existing: 7 });

    let ctx = ingredient_suggest::state::AppContext::new(Arc::new(common::TrigramEncoder), collection);
    let after = ctx.suggest("arroz".to_string()).await?;
    assert_eq!(before, after);
    Ok(())
}

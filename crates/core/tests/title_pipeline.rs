//! End-to-end tests for the title cache and stream link pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use linklater_core::testing::{MockCompletionClient, MockEngine};
use linklater_core::{
    CacheError, ExtensionClassifier, LinkProjector, MediaFile, MemoryLayer, RouterLayer,
    ServerConfig, SqliteTitleStore, StreamLinkService, TitleCoordinator, TitleGenerator,
    TitleStore, TorrentId,
};

/// Transparent wrapper so a layer can be observed from outside the chain
/// while the chain owns its own handle to it.
struct Shared(Arc<dyn TitleStore>);

impl TitleStore for Shared {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn has_bucket(&self, id: &TorrentId) -> bool {
        self.0.has_bucket(id)
    }

    fn store_bucket(
        &self,
        id: &TorrentId,
        titles: &HashMap<String, String>,
    ) -> Result<(), CacheError> {
        self.0.store_bucket(id, titles)
    }

    fn lookup(&self, id: &TorrentId, path: &str) -> Option<String> {
        self.0.lookup(id, path)
    }

    fn drop_bucket(&self, id: &TorrentId) -> Result<(), CacheError> {
        self.0.drop_bucket(id)
    }
}

fn server_config() -> ServerConfig {
    ServerConfig {
        host: Some("192.168.1.5".parse().unwrap()),
        public_host: None,
        port: 8090,
    }
}

fn build_service(
    root: &TempDir,
    engine: Arc<MockEngine>,
    client: Arc<MockCompletionClient>,
    cache: Arc<dyn TitleStore>,
) -> StreamLinkService {
    let coordinator = TitleCoordinator::new(
        Arc::new(TitleGenerator::new(client)),
        Arc::clone(&cache),
        4,
    );
    let projector = LinkProjector::new(root.path().to_path_buf(), "strmlnk", server_config());
    StreamLinkService::new(
        engine,
        Arc::new(ExtensionClassifier::new()),
        coordinator,
        projector,
        cache,
    )
}

fn three_layer_chain() -> (Arc<dyn TitleStore>, Arc<dyn TitleStore>, Arc<dyn TitleStore>) {
    let durable: Arc<dyn TitleStore> = Arc::new(SqliteTitleStore::in_memory().unwrap());
    let router: Arc<dyn TitleStore> =
        Arc::new(RouterLayer::new(Box::new(Shared(Arc::clone(&durable)))));
    let memory: Arc<dyn TitleStore> =
        Arc::new(MemoryLayer::new(Box::new(Shared(Arc::clone(&router)))));
    (memory, router, durable)
}

#[tokio::test]
async fn end_to_end_duplicate_names_get_numbered_links() -> Result<()> {
    let root = TempDir::new()?;
    let engine = Arc::new(MockEngine::new());
    let client = Arc::new(MockCompletionClient::always("Movie File (2020)"));
    let (cache, _, _) = three_layer_chain();
    let id = TorrentId::new("abc123").unwrap();

    engine.add_torrent(
        &id,
        vec![
            MediaFile::new("cd1/Movie.File.2020.mkv", 0, 1024),
            MediaFile::new("cd2/Movie.File.2020.mkv", 1, 1024),
        ],
    );
    engine.set_display_title(&id, "Movie File 2020");

    let service = build_service(&root, engine, client.clone(), Arc::clone(&cache));
    service.refresh(&id).await;

    // Both paths share the generated title in the bucket.
    assert!(cache.has_bucket(&id));
    assert_eq!(
        cache.lookup(&id, "cd1/Movie.File.2020.mkv").as_deref(),
        Some("Movie File (2020)")
    );
    assert_eq!(
        cache.lookup(&id, "cd2/Movie.File.2020.mkv").as_deref(),
        Some("Movie File (2020)")
    );

    // Colliding link names get numbered in listing order, each carrying
    // the originating file's index.
    let dir = root.path().join("Movie File 2020");
    let first = std::fs::read_to_string(dir.join("Movie File (2020).strmlnk"))?;
    assert_eq!(
        first,
        "http://192.168.1.5:8090/stream/Movie.File.2020.mkv?link=abc123&index=0&play"
    );
    let second = std::fs::read_to_string(dir.join("Movie File (2020) (2).strmlnk"))?;
    assert!(second.contains("index=1"));
    assert!(second.contains("link=abc123"));

    let marker = std::fs::read_to_string(dir.join(".hash"))?;
    assert_eq!(marker, "abc123");
    Ok(())
}

#[tokio::test]
async fn refresh_twice_runs_one_provider_batch() -> Result<()> {
    let root = TempDir::new()?;
    let engine = Arc::new(MockEngine::new());
    let client = Arc::new(MockCompletionClient::always("Movie File (2020)"));
    let db = TempDir::new()?;
    let cache = linklater_core::layered_store(&db.path().join("titles.db")).unwrap();
    let id = TorrentId::new("abc123").unwrap();

    engine.add_torrent(&id, vec![MediaFile::new("movie.mkv", 0, 1024)]);
    engine.set_display_title(&id, "Movie");

    let service = build_service(&root, engine, client.clone(), cache);
    service.refresh(&id).await;
    let calls_after_first = client.calls();
    assert!(calls_after_first > 0);

    service.refresh(&id).await;
    assert_eq!(client.calls(), calls_after_first);

    // The second projection still rebuilt an identical directory.
    let dir = root.path().join("Movie");
    assert!(dir.join("Movie File (2020).strmlnk").exists());
    Ok(())
}

#[tokio::test]
async fn chain_stays_coherent_across_store_and_drop() -> Result<()> {
    let (memory, router, durable) = three_layer_chain();
    let id = TorrentId::new("abc123").unwrap();

    let titles: HashMap<String, String> =
        [("a.mkv".to_string(), "A (2020)".to_string())].into();

    memory.store_bucket(&id, &titles).unwrap();
    assert!(memory.has_bucket(&id));
    assert!(router.has_bucket(&id));
    assert!(durable.has_bucket(&id));

    // Populate the memory layer's blob cache before dropping.
    assert_eq!(memory.lookup(&id, "a.mkv").as_deref(), Some("A (2020)"));

    memory.drop_bucket(&id).unwrap();
    assert!(!memory.has_bucket(&id));
    assert!(!router.has_bucket(&id));
    assert!(!durable.has_bucket(&id));
    assert_eq!(memory.lookup(&id, "a.mkv"), None);
    assert_eq!(durable.lookup(&id, "a.mkv"), None);
    Ok(())
}

#[tokio::test]
async fn title_change_moves_link_directory() -> Result<()> {
    let root = TempDir::new()?;
    let engine = Arc::new(MockEngine::new());
    let client = Arc::new(MockCompletionClient::always("Movie File (2020)"));
    let (cache, _, _) = three_layer_chain();
    let id = TorrentId::new("abc123").unwrap();

    engine.add_torrent(&id, vec![MediaFile::new("movie.mkv", 0, 1024)]);
    engine.set_display_title(&id, "Early Title");

    let service = build_service(&root, Arc::clone(&engine), client, cache);
    service.refresh(&id).await;
    assert!(root.path().join("Early Title").exists());

    engine.set_display_title(&id, "Renamed Title");
    service.refresh(&id).await;

    assert!(!root.path().join("Early Title").exists());
    assert!(root.path().join("Renamed Title").exists());
    Ok(())
}

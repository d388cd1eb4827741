//! End-to-end test infrastructure for entity-atlas.
//!
//! Provides a shared TestHarness and a flaky search backend for tests
//! covering the full enqueue-index-recover cycle against real RocksDB
//! and Tantivy instances.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use atlas_indexing::{EntityIndexer, EntitySource, SearchBackend, TantivyBackend};
use atlas_search::{EntitySearcher, SearchError, SearchIndex, SearchIndexConfig};
use atlas_storage::Storage;
use atlas_types::{Entity, IndexDocument};

/// Shared test harness for E2E tests.
///
/// Owns a temp directory holding both the RocksDB store and the Tantivy
/// index directory.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Shared storage instance
    pub storage: Arc<Storage>,
    /// Path for the Tantivy index files
    pub index_path: PathBuf,
}

impl TestHarness {
    /// Create a new test harness with temp directory and storage.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let storage = Arc::new(
            Storage::open(&temp_dir.path().join("store")).expect("Failed to open test storage"),
        );

        let index_path = temp_dir.path().join("entity-index");
        std::fs::create_dir_all(&index_path).expect("Failed to create index dir");

        Self {
            _temp_dir: temp_dir,
            storage,
            index_path,
        }
    }

    /// Open the search index at the harness path.
    pub fn search_index(&self) -> SearchIndex {
        SearchIndex::open_or_create(SearchIndexConfig::new(&self.index_path))
            .expect("Failed to open search index")
    }

    /// Build a searcher over the harness index.
    pub fn searcher(&self) -> EntitySearcher {
        EntitySearcher::new(&self.search_index()).expect("Failed to create searcher")
    }

    /// Build an indexer over the harness storage and index.
    ///
    /// Tantivy allows one writer per index directory; call this at most
    /// once per test.
    pub fn indexer(&self) -> EntityIndexer<EntitySource, TantivyBackend> {
        let index = self.search_index();
        let backend = TantivyBackend::open(&index).expect("Failed to open index writer");
        EntityIndexer::new(
            self.storage.clone(),
            EntitySource::new(self.storage.clone()),
            backend,
        )
    }

    /// Build an indexer whose backend availability tests can toggle.
    pub fn flaky_indexer(
        &self,
    ) -> (
        EntityIndexer<EntitySource, Arc<FlakyBackend>>,
        Arc<FlakyBackend>,
    ) {
        let index = self.search_index();
        let backend = Arc::new(FlakyBackend::new(
            TantivyBackend::open(&index).expect("Failed to open index writer"),
        ));
        let indexer = EntityIndexer::new(
            self.storage.clone(),
            EntitySource::new(self.storage.clone()),
            backend.clone(),
        );
        (indexer, backend)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Search backend whose availability can be toggled per instance.
///
/// Rejecting writes while "unavailable" models a temporarily read-only
/// index without corrupting existing documents. The switch is instance
/// state, not a global flag.
pub struct FlakyBackend {
    inner: TantivyBackend,
    unavailable: AtomicBool,
}

impl FlakyBackend {
    pub fn new(inner: TantivyBackend) -> Self {
        Self {
            inner,
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), SearchError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SearchError::IndexLocked("index is write-locked".into()));
        }
        Ok(())
    }
}

impl SearchBackend for FlakyBackend {
    fn upsert(&self, document: &IndexDocument) -> Result<(), SearchError> {
        self.check()?;
        self.inner.upsert(document)
    }

    fn delete(&self, entity_id: &str) -> Result<(), SearchError> {
        self.check()?;
        self.inner.delete(entity_id)
    }

    fn commit(&self) -> Result<(), SearchError> {
        self.check()?;
        self.inner.commit()
    }
}

/// Insert entities into the store.
pub fn insert_entities(storage: &Storage, entities: &[Entity]) {
    for entity in entities {
        storage.put_entity(entity).expect("Failed to put entity");
    }
}

/// Create a main-variant entity with a derived description.
pub fn sample_entity(id: &str, name: &str, group: &str) -> Entity {
    Entity::new(id, name, group).with_description(format!("{} description", name))
}

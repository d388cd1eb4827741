//! Read path using BM25 scoring.
//!
//! Provides keyword search over entity names and descriptions, plus the
//! verification helpers callers use to inspect index contents.

use tantivy::collector::TopDocs;
use tantivy::query::{AllQuery, QueryParser};
use tantivy::schema::Value;
use tantivy::IndexReader;
use tracing::{debug, info};

use crate::error::SearchError;
use crate::index::SearchIndex;
use crate::schema::EntitySchema;

/// A search result with relevance score.
#[derive(Debug, Clone)]
pub struct EntityHit {
    /// Entity identifier
    pub entity_id: String,
    /// Display name
    pub name: String,
    /// Grouping/parent identifier
    pub group_id: String,
    /// BM25 relevance score
    pub score: f32,
}

/// Searcher for entity queries using BM25 ranking.
pub struct EntitySearcher {
    reader: IndexReader,
    schema: EntitySchema,
    query_parser: QueryParser,
}

impl EntitySearcher {
    /// Create a new searcher from a SearchIndex.
    pub fn new(index: &SearchIndex) -> Result<Self, SearchError> {
        let reader = index.reader()?;
        let schema = index.schema().clone();

        // Query parser targeting name and text fields
        let query_parser = QueryParser::for_index(index.index(), vec![schema.name, schema.text]);

        Ok(Self {
            reader,
            schema,
            query_parser,
        })
    }

    /// Reload the reader to see recent commits.
    pub fn reload(&self) -> Result<(), SearchError> {
        self.reader.reload()?;
        debug!("Reloaded search reader");
        Ok(())
    }

    /// Search with a query string.
    ///
    /// Uses BM25 scoring over name and text fields.
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<EntityHit>, SearchError> {
        if query_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        self.reader.reload()?;
        let searcher = self.reader.searcher();

        let query = self.query_parser.parse_query(query_str)?;
        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit.max(1)))?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: tantivy::TantivyDocument = searcher.doc(doc_address)?;

            let entity_id = doc
                .get_first(self.schema.entity_id)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();

            let name = doc
                .get_first(self.schema.name)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();

            let group_id = doc
                .get_first(self.schema.group_id)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();

            results.push(EntityHit {
                entity_id,
                name,
                group_id,
                score,
            });
        }

        info!(
            query = query_str,
            results = results.len(),
            "Entity search complete"
        );

        Ok(results)
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> Result<u64, SearchError> {
        self.reader.reload()?;
        Ok(self.reader.searcher().num_docs())
    }

    /// All indexed entity ids, in no particular order.
    ///
    /// Intended for verification by callers and tests, not for serving
    /// queries.
    pub fn all_ids(&self) -> Result<Vec<String>, SearchError> {
        self.reader.reload()?;
        let searcher = self.reader.searcher();

        let count = searcher.num_docs() as usize;
        if count == 0 {
            return Ok(Vec::new());
        }

        let top_docs = searcher.search(&AllQuery, &TopDocs::with_limit(count))?;
        let mut ids = Vec::with_capacity(top_docs.len());
        for (_score, doc_address) in top_docs {
            let doc: tantivy::TantivyDocument = searcher.doc(doc_address)?;
            if let Some(id) = doc.get_first(self.schema.entity_id).and_then(|v| v.as_str()) {
                ids.push(id.to_string());
            }
        }

        Ok(ids)
    }
}

// ==========================================
// Seguimiento - chunked lookup resolver
// ==========================================
// Resolves a large key set against a reference table under the
// backend's IN-list cardinality limit: de-duplicate, partition
// into bounded chunks, one lookup query per chunk, merge into a
// single key -> row map.
// ==========================================

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::Value;

use crate::config::FetchLimits;
use crate::store::row::key_string;
use crate::store::{JsonRow, QuerySpec, StoreClient};

use super::error::FetchError;

/// Foreign-key resolver for reference tables (article names,
/// order-type labels, asset values).
pub struct ChunkedLookup {
    client: Arc<dyn StoreClient>,
    chunk_size: usize,
}

impl ChunkedLookup {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self::with_limits(client, FetchLimits::default())
    }

    pub fn with_limits(client: Arc<dyn StoreClient>, limits: FetchLimits) -> Self {
        Self {
            client,
            chunk_size: limits.chunk_size,
        }
    }

    /// Resolve `keys` against `table`, keyed by `key_column`.
    ///
    /// Chunk queries are independent and issued concurrently;
    /// results merge in chunk order, so a duplicate key across
    /// chunks resolves to the later occurrence. Keys with no row
    /// are simply absent from the map: callers supply their own
    /// fallback display value. A failed chunk aborts the whole
    /// resolution.
    pub async fn resolve(
        &self,
        table: &str,
        key_column: &str,
        columns: &[&str],
        keys: &[Value],
    ) -> Result<HashMap<String, JsonRow>, FetchError> {
        // de-duplicate preserving first-seen order
        let mut seen: HashSet<String> = HashSet::new();
        let mut unique: Vec<Value> = Vec::new();
        for key in keys {
            if seen.insert(key_string(key)) {
                unique.push(key.clone());
            }
        }

        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        // the key column must come back with each row to key the map
        let mut projection: Vec<String> = vec![key_column.to_string()];
        projection.extend(
            columns
                .iter()
                .filter(|c| **c != key_column)
                .map(|c| c.to_string()),
        );

        let chunk_futures = unique
            .chunks(self.chunk_size)
            .enumerate()
            .map(|(chunk_idx, chunk)| {
                let client = Arc::clone(&self.client);
                let query = QuerySpec::new(table)
                    .columns(projection.clone())
                    .is_in(key_column, chunk.to_vec());
                let table = table.to_string();
                async move {
                    client
                        .select(&query)
                        .await
                        .map_err(|source| FetchError::Chunk {
                            table,
                            chunk: chunk_idx,
                            source,
                        })
                }
            })
            .collect::<Vec<_>>();

        let chunk_results = try_join_all(chunk_futures).await?;

        let mut resolved: HashMap<String, JsonRow> = HashMap::new();
        for rows in chunk_results {
            for row in rows {
                if let Some(key) = row.get(key_column) {
                    // last resolution wins on duplicates
                    resolved.insert(key_string(key), row);
                }
            }
        }

        tracing::debug!(
            table,
            requested = unique.len(),
            resolved = resolved.len(),
            "chunked lookup complete"
        );
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreError, StoreResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Lookup table stub resolving even-numbered ids only, counting
    /// the queries it receives.
    struct EvenIdTable {
        requests: AtomicUsize,
        fail: bool,
    }

    impl EvenIdTable {
        fn new() -> Self {
            Self {
                requests: AtomicUsize::new(0),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl StoreClient for EvenIdTable {
        async fn select(&self, query: &QuerySpec) -> StoreResult<Vec<JsonRow>> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Query("lookup down".to_string()));
            }

            let crate::store::Filter::In(_, values) = &query.filters[0] else {
                panic!("resolver always issues IN filters");
            };
            Ok(values
                .iter()
                .filter_map(|v| v.as_i64())
                .filter(|id| id % 2 == 0)
                .map(|id| {
                    let mut row = JsonRow::new();
                    row.insert("id".to_string(), json!(id));
                    row.insert("name".to_string(), json!(format!("item-{id}")));
                    row
                })
                .collect())
        }

        async fn insert(&self, _t: &str, _r: &JsonRow) -> StoreResult<()> {
            unimplemented!("read-only stub")
        }

        async fn upsert(&self, _t: &str, _c: &str, _r: &JsonRow) -> StoreResult<()> {
            unimplemented!("read-only stub")
        }
    }

    fn lookup(client: Arc<EvenIdTable>, chunk_size: usize) -> ChunkedLookup {
        ChunkedLookup::with_limits(
            client,
            FetchLimits {
                chunk_size,
                ..FetchLimits::default()
            },
        )
    }

    /// K keys under chunk size C take exactly ceil(K/C) queries.
    #[tokio::test]
    async fn test_chunk_query_count_property() {
        let cases = [(1usize, 5usize, 1usize), (5, 5, 1), (6, 5, 2), (23, 5, 5)];

        for (key_count, chunk_size, expected_queries) in cases {
            let backend = Arc::new(EvenIdTable::new());
            let keys: Vec<Value> = (0..key_count as i64).map(|i| json!(i)).collect();

            let map = lookup(Arc::clone(&backend), chunk_size)
                .resolve("articles", "id", &["name"], &keys)
                .await
                .unwrap();

            assert_eq!(
                backend.requests.load(Ordering::SeqCst),
                expected_queries,
                "K={key_count}"
            );
            // every resolvable (even) key has an entry, odd keys are absent
            for i in 0..key_count as i64 {
                assert_eq!(map.contains_key(&i.to_string()), i % 2 == 0, "key {i}");
            }
        }
    }

    #[tokio::test]
    async fn test_keys_are_deduplicated_before_chunking() {
        let backend = Arc::new(EvenIdTable::new());
        let keys: Vec<Value> = vec![json!(2), json!(2), json!(2), json!(4)];

        let map = lookup(Arc::clone(&backend), 100)
            .resolve("articles", "id", &["name"], &keys)
            .await
            .unwrap();

        assert_eq!(backend.requests.load(Ordering::SeqCst), 1);
        assert_eq!(map.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_key_set_issues_no_queries() {
        let backend = Arc::new(EvenIdTable::new());
        let map = lookup(Arc::clone(&backend), 100)
            .resolve("articles", "id", &["name"], &[])
            .await
            .unwrap();

        assert!(map.is_empty());
        assert_eq!(backend.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_chunk_aborts_resolution() {
        let backend = Arc::new(EvenIdTable {
            requests: AtomicUsize::new(0),
            fail: true,
        });

        let err = lookup(backend, 2)
            .resolve("articles", "id", &["name"], &[json!(1), json!(2), json!(3)])
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Chunk { .. }), "{err}");
    }
}

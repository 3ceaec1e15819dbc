//! Integration tests for the cached schema provider.

use async_trait::async_trait;
use sk_core::{QueryLoader, SqlValue, TableRef};
use sk_db::{Database, DbResult, DuckDbBackend, ResultSet};
use sk_meta::{MetaError, SchemaCache, SchemaIntrospector, SchemaProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// DuckDB wrapper that counts read queries.
struct CountingDb {
    inner: DuckDbBackend,
    queries: AtomicUsize,
}

#[async_trait]
impl Database for CountingDb {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.inner.execute_batch(sql).await
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<ResultSet> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(sql, params).await
    }

    fn db_type(&self) -> &'static str {
        "counting"
    }

    fn catalog_name(&self) -> &str {
        self.inner.catalog_name()
    }
}

struct Fixture {
    db: Arc<CountingDb>,
    provider: Arc<SchemaProvider>,
    cache_dir: TempDir,
}

impl Fixture {
    async fn new() -> Self {
        let inner = DuckDbBackend::in_memory().unwrap();
        inner
            .execute_batch(
                "CREATE TABLE users (id INTEGER NOT NULL PRIMARY KEY, email VARCHAR, name VARCHAR);",
            )
            .await
            .unwrap();
        let db = Arc::new(CountingDb {
            inner,
            queries: AtomicUsize::new(0),
        });
        let cache_dir = TempDir::new().unwrap();
        let introspector =
            SchemaIntrospector::new(db.clone(), Arc::new(QueryLoader::builtin().unwrap()));
        let provider = SchemaProvider::new(introspector, SchemaCache::new(cache_dir.path(), 3600));
        Self {
            db,
            provider: Arc::new(provider),
            cache_dir,
        }
    }

    fn queries(&self) -> usize {
        self.db.queries.load(Ordering::SeqCst)
    }
}

fn users() -> TableRef {
    TableRef::parse("memory.main.users").unwrap()
}

#[tokio::test]
async fn test_get_table_schema_marks_primary_key() {
    let fx = Fixture::new().await;
    let schema = fx.provider.get_table_schema(&users()).await.unwrap();

    assert_eq!(schema.table_ref(), "memory.main.users");
    assert_eq!(schema.column_names(), vec!["id", "email", "name"]);
    assert_eq!(schema.primary_key_columns(), vec!["id"]);
    assert!(!schema.columns[0].is_nullable);
    assert!(fx
        .cache_dir
        .path()
        .join("memory")
        .join("main.users.json")
        .exists());
}

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let fx = Fixture::new().await;
    fx.provider.get_table_schema(&users()).await.unwrap();
    let after_first = fx.queries();
    assert_eq!(after_first, 2);

    fx.provider.get_table_schema(&users()).await.unwrap();
    assert_eq!(fx.queries(), after_first);
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let fx = Fixture::new().await;
    fx.provider.get_table_schema(&users()).await.unwrap();
    fx.provider.invalidate_table_schema(&users()).unwrap();
    fx.provider.get_table_schema(&users()).await.unwrap();
    assert_eq!(fx.queries(), 4);
}

#[tokio::test]
async fn test_validate_columns_is_case_insensitive_and_drops_unknown() {
    let fx = Fixture::new().await;
    let valid = fx
        .provider
        .validate_columns(&users(), &["EMAIL", "nope", "Id"])
        .await
        .unwrap();
    assert_eq!(valid, vec!["email", "id"]);
}

#[tokio::test]
async fn test_resolve_columns() {
    let fx = Fixture::new().await;

    let all = fx
        .provider
        .resolve_columns::<&str>(&users(), None)
        .await
        .unwrap();
    assert_eq!(all.column_names(), vec!["id", "email", "name"]);

    let star = fx
        .provider
        .resolve_columns(&users(), Some(&["*"][..]))
        .await
        .unwrap();
    assert_eq!(star, all);

    let some = fx
        .provider
        .resolve_columns(&users(), Some(&["NAME", "id", "ghost"][..]))
        .await
        .unwrap();
    assert_eq!(some.table_ref, "memory.main.users");
    assert_eq!(some.column_names(), vec!["id", "name"]);
}

#[tokio::test]
async fn test_missing_table_is_an_error_and_not_cached() {
    let fx = Fixture::new().await;
    let missing = TableRef::parse("memory.main.ghost").unwrap();
    let err = fx.provider.get_table_schema(&missing).await.unwrap_err();
    assert!(matches!(err, MetaError::TableNotFound { .. }));
    assert!(fx.provider.cache().get(&missing).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_lookups_share_one_fetch() {
    let fx = Fixture::new().await;
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let provider = fx.provider.clone();
            tokio::spawn(async move { provider.get_table_schema(&users()).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(fx.queries(), 2);
}

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use metrics_util::debugging::DebuggingRecorder;

use noticeboard::application::board::{BoardReader, BoardWriter, PostMessageCommand};
use noticeboard::application::repos::MessagesRepo;
use noticeboard::cache::{CacheConfig, CacheError, LruPageCache, PageCache, PageKey};
use noticeboard::infra::memory::InMemoryMessages;

struct UnreachableCache;

#[async_trait]
impl PageCache for UnreachableCache {
    async fn get(&self, _key: &PageKey) -> Result<Option<Bytes>, CacheError> {
        Err(CacheError::Unavailable("unreachable".into()))
    }

    async fn set(&self, _key: PageKey, _value: Bytes) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("unreachable".into()))
    }

    async fn generation(&self) -> Result<u64, CacheError> {
        Ok(0)
    }

    async fn set_if_current(
        &self,
        _key: PageKey,
        _value: Bytes,
        _generation: u64,
    ) -> Result<bool, CacheError> {
        Err(CacheError::Unavailable("unreachable".into()))
    }

    async fn flush(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

#[tokio::test]
async fn board_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let messages: Arc<dyn MessagesRepo> = Arc::new(InMemoryMessages::new());
    let cache: Arc<dyn PageCache> = Arc::new(LruPageCache::new(&CacheConfig {
        page_limit: 1,
        ..Default::default()
    }));
    let reader = BoardReader::new(messages.clone()).with_cache(cache.clone());
    let writer = BoardWriter::new(messages.clone()).with_cache(cache);

    writer
        .post_message(PostMessageCommand::new("alice", "hello"))
        .await
        .expect("posted");

    // Miss then hit on page one, then a second page evicts it.
    reader.page(1, 5).await.expect("miss");
    reader.page(1, 5).await.expect("hit");
    reader.page(2, 5).await.expect("evicts page one");

    // Cache failures fall back to the store.
    let degraded = BoardReader::new(messages).with_cache(Arc::new(UnreachableCache));
    degraded.page(1, 5).await.expect("store fallback");

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "noticeboard_cache_page_hit_total",
        "noticeboard_cache_page_miss_total",
        "noticeboard_cache_page_evict_total",
        "noticeboard_cache_flush_total",
        "noticeboard_cache_fallback_total",
        "noticeboard_store_page_ms",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;

use noticeboard::application::board::{BoardReader, BoardWriter, PostMessageCommand};
use noticeboard::application::repos::{MessagesRepo, RepoError};
use noticeboard::cache::{CacheConfig, CacheError, LruPageCache, PageCache, PageKey};
use noticeboard::domain::entities::MessageRecord;
use noticeboard::domain::messages::NewMessage;
use noticeboard::infra::memory::InMemoryMessages;

/// Counts store reads so tests can tell cache hits from store round-trips.
#[derive(Default)]
struct CountingMessages {
    inner: InMemoryMessages,
    lists: AtomicUsize,
    fail_writes: AtomicBool,
}

impl CountingMessages {
    fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessagesRepo for CountingMessages {
    async fn insert_message(&self, message: &NewMessage) -> Result<MessageRecord, RepoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Timeout);
        }
        self.inner.insert_message(message).await
    }

    async fn count_messages(&self) -> Result<u64, RepoError> {
        self.inner.count_messages().await
    }

    async fn list_messages(&self, skip: u64, limit: u32) -> Result<Vec<MessageRecord>, RepoError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_messages(skip, limit).await
    }

    async fn delete_all_messages(&self) -> Result<u64, RepoError> {
        self.inner.delete_all_messages().await
    }
}

/// Holds the next `list_messages` call after it has read the store, until
/// `resume` is notified.
#[derive(Default)]
struct PausingMessages {
    inner: InMemoryMessages,
    armed: AtomicBool,
    paused: Notify,
    resume: Notify,
}

#[async_trait]
impl MessagesRepo for PausingMessages {
    async fn insert_message(&self, message: &NewMessage) -> Result<MessageRecord, RepoError> {
        self.inner.insert_message(message).await
    }

    async fn count_messages(&self) -> Result<u64, RepoError> {
        self.inner.count_messages().await
    }

    async fn list_messages(&self, skip: u64, limit: u32) -> Result<Vec<MessageRecord>, RepoError> {
        let items = self.inner.list_messages(skip, limit).await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.paused.notify_one();
            self.resume.notified().await;
        }
        Ok(items)
    }

    async fn delete_all_messages(&self) -> Result<u64, RepoError> {
        self.inner.delete_all_messages().await
    }
}

/// A cache whose every operation fails.
struct BrokenCache;

#[async_trait]
impl PageCache for BrokenCache {
    async fn get(&self, _key: &PageKey) -> Result<Option<Bytes>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set(&self, _key: PageKey, _value: Bytes) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn generation(&self) -> Result<u64, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set_if_current(
        &self,
        _key: PageKey,
        _value: Bytes,
        _generation: u64,
    ) -> Result<bool, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn flush(&self) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

struct Board {
    repo: Arc<CountingMessages>,
    cache: Arc<LruPageCache>,
    reader: BoardReader,
    writer: BoardWriter,
}

fn board() -> Board {
    let repo = Arc::new(CountingMessages::default());
    let cache = Arc::new(LruPageCache::new(&CacheConfig::default()));
    let messages: Arc<dyn MessagesRepo> = repo.clone();
    let shared: Arc<dyn PageCache> = cache.clone();

    Board {
        reader: BoardReader::new(messages.clone()).with_cache(shared.clone()),
        writer: BoardWriter::new(messages).with_cache(shared),
        repo,
        cache,
    }
}

async fn post(writer: &BoardWriter, username: &str, content: &str) -> MessageRecord {
    writer
        .post_message(PostMessageCommand::new(username, content))
        .await
        .expect("message should be posted")
}

#[tokio::test]
async fn posted_message_leads_the_first_page() {
    let board = board();
    post(&board.writer, "alice", "hello, board").await;

    let page = board.reader.page(1, 10).await.expect("page");
    let first = page.items.first().expect("one message");
    assert_eq!(first.username, "alice");
    assert_eq!(first.content, "hello, board");
}

#[tokio::test]
async fn clear_all_twice_leaves_store_empty() {
    let board = board();
    post(&board.writer, "alice", "one").await;
    post(&board.writer, "bob", "two").await;

    board.writer.clear_all().await.expect("first clear");
    assert_eq!(board.repo.count_messages().await.expect("count"), 0);

    let deleted = board.writer.clear_all().await.expect("second clear");
    assert_eq!(deleted, 0);
    assert_eq!(board.repo.count_messages().await.expect("count"), 0);
}

#[tokio::test]
async fn post_invalidates_cached_pagination() {
    let board = board();
    for n in 0..6 {
        post(&board.writer, "u", &format!("m{n}")).await;
    }

    let before = board.reader.page(1, 5).await.expect("page");
    assert_eq!(before.items.len(), 5);
    assert_eq!(before.total_pages, 2);

    // Cached now; a second read does not touch the store.
    let lists = board.repo.lists();
    board.reader.page(1, 5).await.expect("cached page");
    assert_eq!(board.repo.lists(), lists);

    post(&board.writer, "u", "m6").await;
    assert!(board.cache.is_empty());

    let after = board.reader.page(1, 5).await.expect("page");
    assert_eq!(board.repo.lists(), lists + 1);
    assert_eq!(after.items[0].content, "m6");
    assert_eq!(after.total_pages, 2);

    let second = board.reader.page(2, 5).await.expect("page");
    let contents: Vec<_> = second.items.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m1", "m0"]);
}

#[tokio::test]
async fn clear_invalidates_cached_pages() {
    let board = board();
    post(&board.writer, "u", "soon gone").await;
    assert_eq!(board.reader.page(1, 5).await.expect("page").items.len(), 1);

    board.writer.clear_all().await.expect("clear");

    let page = board.reader.page(1, 5).await.expect("page");
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let board = board();
    for content in ["a", "b", "c"] {
        post(&board.writer, "u", content).await;
    }

    let page = board.reader.page(100, 5).await.expect("page");
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page, 100);
}

#[tokio::test]
async fn newest_messages_come_first() {
    let board = board();
    for content in ["A", "B", "C"] {
        post(&board.writer, "u", content).await;
    }

    let page = board.reader.page(1, 2).await.expect("page");
    let contents: Vec<_> = page.items.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["C", "B"]);
}

#[tokio::test]
async fn empty_fields_are_rejected_without_writes() {
    let board = board();
    board
        .cache
        .set(PageKey::new(1, 5), Bytes::from_static(b"keep"))
        .await
        .expect("seed cache");

    for (username, content) in [("", "hello"), ("bob", ""), ("   ", "hello")] {
        let err = board
            .writer
            .post_message(PostMessageCommand::new(username, content))
            .await
            .expect_err("empty field rejected");
        assert!(err.is_invalid_input());
    }

    let missing = board
        .writer
        .post_message(PostMessageCommand {
            username: Some("bob".into()),
            content: None,
        })
        .await
        .expect_err("missing field rejected");
    assert!(missing.is_invalid_input());

    assert_eq!(board.repo.count_messages().await.expect("count"), 0);
    assert_eq!(board.cache.len(), 1);
}

#[tokio::test]
async fn page_sizes_are_cached_separately() {
    let board = board();
    for n in 0..12 {
        post(&board.writer, "u", &format!("m{n}")).await;
    }

    let five = board.reader.page(1, 5).await.expect("page");
    let ten = board.reader.page(1, 10).await.expect("page");
    assert_eq!(five.items.len(), 5);
    assert_eq!(five.total_pages, 3);
    assert_eq!(ten.items.len(), 10);
    assert_eq!(ten.total_pages, 2);

    let five_again = board.reader.page(1, 5).await.expect("cached page");
    assert_eq!(five_again, five);
}

#[tokio::test]
async fn cache_hit_reports_page_count_from_store_size() {
    let board = board();
    for n in 0..7 {
        post(&board.writer, "u", &format!("m{n}")).await;
    }

    // The last page holds two messages, but the count covers all seven.
    board.reader.page(2, 5).await.expect("page");
    let cached = board.reader.page(2, 5).await.expect("cached page");
    assert_eq!(cached.items.len(), 2);
    assert_eq!(cached.total_pages, 2);
}

#[tokio::test]
async fn broken_cache_falls_back_to_store_on_reads() {
    let repo: Arc<dyn MessagesRepo> = Arc::new(InMemoryMessages::new());
    let plain_writer = BoardWriter::new(repo.clone());
    plain_writer
        .post_message(PostMessageCommand::new("alice", "still readable"))
        .await
        .expect("posted");

    let reader = BoardReader::new(repo).with_cache(Arc::new(BrokenCache));
    let page = reader.page(1, 5).await.expect("store answers");
    assert_eq!(page.items[0].content, "still readable");
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn failed_flush_after_write_is_reported() {
    let repo = Arc::new(InMemoryMessages::new());
    let writer = BoardWriter::new(repo.clone()).with_cache(Arc::new(BrokenCache));

    let err = writer
        .post_message(PostMessageCommand::new("alice", "hello"))
        .await
        .expect_err("flush failure surfaces");
    assert!(!err.is_invalid_input());
    // The store write itself went through.
    assert_eq!(repo.count_messages().await.expect("count"), 1);
}

#[tokio::test]
async fn store_failure_is_backend_unavailable() {
    let board = board();
    board.repo.fail_writes.store(true, Ordering::SeqCst);

    let err = board
        .writer
        .post_message(PostMessageCommand::new("alice", "hello"))
        .await
        .expect_err("store down");
    assert!(!err.is_invalid_input());
    assert_eq!(err.to_string(), "service unavailable: insert_message failed");
}

#[tokio::test]
async fn page_read_before_a_write_is_not_cached_after_its_flush() {
    let repo = Arc::new(PausingMessages::default());
    let cache = Arc::new(LruPageCache::new(&CacheConfig::default()));
    let messages: Arc<dyn MessagesRepo> = repo.clone();
    let shared: Arc<dyn PageCache> = cache.clone();
    let reader = BoardReader::new(messages.clone()).with_cache(shared.clone());
    let writer = BoardWriter::new(messages).with_cache(shared);

    post(&writer, "u", "old").await;
    repo.armed.store(true, Ordering::SeqCst);

    let racing = reader.clone();
    let read = tokio::spawn(async move { racing.page(1, 5).await });

    // The reader has listed ["old"] and is paused before caching it.
    repo.paused.notified().await;
    post(&writer, "u", "new").await;
    repo.resume.notify_one();

    let stale = read.await.expect("reader task").expect("page");
    assert_eq!(stale.items.len(), 1);
    assert!(cache.is_empty());

    let page = reader.page(1, 5).await.expect("page");
    let contents: Vec<_> = page.items.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["new", "old"]);
    assert_eq!(page.total_pages, 1);
}

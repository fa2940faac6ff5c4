//! In-process message cache with single-flight deduplication.
//!
//! Keys are content fingerprints over the target profile and template.
//! Entries expire after a TTL and the store holds at most `max_entries`
//! values, evicting in insertion order. A pending map coalesces concurrent
//! requests for the same fingerprint onto one generation.

use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tokio::sync::broadcast;

use crate::error::GenerationError;

/// Outcome broadcast to every caller attached to one in-flight generation.
pub type GenerationResult = std::result::Result<String, GenerationError>;

/// Fingerprint for cache and dedup keys: SHA-256 over the target's name,
/// company, and the first 100 characters of the template. Requests differing
/// only in deeper profile fields intentionally share a key.
pub fn fingerprint(name: &str, company: &str, template: &str) -> String {
    let head: String = template.chars().take(100).collect();
    let payload = serde_json::json!({
        "name": name,
        "company": company,
        "template": head,
    });
    let digest = Sha256::digest(payload.to_string().as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

struct CacheEntry {
    message: String,
    inserted_at: Instant,
}

struct StoreInner {
    entries: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
    pending: HashMap<String, broadcast::Sender<GenerationResult>>,
}

/// Result of atomically consulting the cache and the pending map.
pub enum Acquire {
    /// A fresh cached message exists.
    Cached(String),
    /// Another caller is already generating for this key; await the receiver.
    Pending(broadcast::Receiver<GenerationResult>),
    /// This caller owns the generation and must call `complete`.
    Lead(broadcast::Receiver<GenerationResult>),
}

/// Shared cache/dedup store. Cloning is cheap and all clones observe the
/// same state.
#[derive(Clone)]
pub struct MessageStore {
    inner: Arc<Mutex<StoreInner>>,
    ttl: Duration,
    capacity: usize,
}

impl MessageStore {
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                pending: HashMap::new(),
            })),
            ttl: Duration::from_secs(ttl_secs),
            capacity: max_entries.max(1),
        }
    }

    fn lookup_locked(&self, inner: &mut StoreInner, key: &str) -> Option<String> {
        match inner.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.message.clone()),
            Some(_) => {
                inner.entries.remove(key);
                inner.order.retain(|k| k != key);
                None
            }
            None => None,
        }
    }

    fn insert_locked(&self, inner: &mut StoreInner, key: &str, message: String) {
        if inner.entries.contains_key(key) {
            inner.order.retain(|k| k != key);
        } else {
            while inner.entries.len() >= self.capacity {
                match inner.order.pop_front() {
                    Some(oldest) => {
                        inner.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        inner.order.push_back(key.to_string());
        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                message,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Fresh cached message for `key`, if any. Expired entries are evicted.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        self.lookup_locked(&mut inner, key)
    }

    pub fn insert(&self, key: &str, message: String) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        self.insert_locked(&mut inner, key, message);
    }

    /// Check cache, then the pending map, then register this caller as the
    /// generation lead. The whole sequence runs under one lock acquisition so
    /// two racing callers can never both become lead.
    pub fn acquire(&self, key: &str) -> Acquire {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(message) = self.lookup_locked(&mut inner, key) {
            return Acquire::Cached(message);
        }
        if let Some(tx) = inner.pending.get(key) {
            return Acquire::Pending(tx.subscribe());
        }
        let (tx, rx) = broadcast::channel(1);
        inner.pending.insert(key.to_string(), tx);
        Acquire::Lead(rx)
    }

    /// Finish a generation: cache the message on success, clear the pending
    /// registration unconditionally, and broadcast the outcome to every
    /// waiter. Waiters subscribed while the key was pending, so the send
    /// cannot race past them.
    pub fn complete(&self, key: &str, outcome: GenerationResult) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Ok(message) = &outcome {
            self.insert_locked(&mut inner, key, message.clone());
        }
        if let Some(tx) = inner.pending.remove(key) {
            let _ = tx.send(outcome);
        }
    }

    /// Arm a guard for a generation this caller leads. The pending slot is
    /// cleared whichever way the task ends: `finish` publishes the real
    /// outcome, and dropping an unfinished guard (task panicked or was
    /// aborted) broadcasts a failure so waiters never hang on the key.
    pub fn completion_guard(&self, key: String) -> CompletionGuard {
        CompletionGuard {
            store: self.clone(),
            key: Some(key),
        }
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Completes a pending generation exactly once, on `finish` or on drop.
pub struct CompletionGuard {
    store: MessageStore,
    key: Option<String>,
}

impl CompletionGuard {
    pub fn finish(mut self, outcome: GenerationResult) {
        if let Some(key) = self.key.take() {
            self.store.complete(&key, outcome);
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.store.complete(
                &key,
                Err(GenerationError::Failed(
                    "generation task ended without an outcome".to_string(),
                )),
            );
        }
    }
}

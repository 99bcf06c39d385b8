//! In-memory database backend.
//!
//! Holds hashes in process and answers the same calls as
//! [`RedisDatabase`](crate::RedisDatabase). Clones share state, so a test can
//! keep one handle for seeding while the code under test reads through
//! another.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::{DbId, FieldValues, SonicDb};
use crate::error::{DbError, DbResult};

#[derive(Debug, Default)]
struct Inner {
    hashes: RwLock<BTreeMap<String, HashMap<String, String>>>,
    published: RwLock<Vec<(String, String)>>,
    unavailable: AtomicBool,
}

/// In-process stand-in for one logical SONiC database.
#[derive(Debug, Clone)]
pub struct MemoryDatabase {
    db: DbId,
    inner: Arc<Inner>,
}

impl MemoryDatabase {
    /// Creates an empty database.
    pub fn new(db: DbId) -> Self {
        Self {
            db,
            inner: Arc::new(Inner::default()),
        }
    }

    /// Sets one field of a raw key.
    pub fn hset(&self, key: &str, field: &str, value: &str) {
        self.inner
            .hashes
            .write()
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    /// Sets fields of `table<sep>key`, creating the entry if needed.
    ///
    /// An empty field list still creates the key, matching how SONiC stores
    /// payload-less entries such as `PORTCHANNEL_MEMBER` as `NULL: NULL`.
    pub fn set_entry(&self, table: &str, key: &str, fields: &[(&str, &str)]) {
        let full_key = self.db.table_key(table, key);
        let mut hashes = self.inner.hashes.write();
        let entry = hashes.entry(full_key).or_default();
        if fields.is_empty() {
            entry.insert("NULL".to_string(), "NULL".to_string());
        }
        for (field, value) in fields {
            entry.insert(field.to_string(), value.to_string());
        }
    }

    /// Makes every subsequent call fail as if the server went away.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns every `(channel, message)` published so far.
    pub fn published(&self) -> Vec<(String, String)> {
        self.inner.published.read().clone()
    }

    fn check(&self, operation: &str) -> DbResult<()> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::command(
                self.db.name(),
                operation,
                "Connection refused",
            ));
        }
        Ok(())
    }
}

/// Matches `text` against a Redis-style glob supporting `*` and `?`.
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            mark = ti;
            pi += 1;
        } else if let Some(s) = star {
            pi = s + 1;
            mark += 1;
            ti = mark;
        } else {
            return false;
        }
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

#[async_trait]
impl SonicDb for MemoryDatabase {
    fn id(&self) -> DbId {
        self.db
    }

    async fn hget(&self, key: &str, field: &str) -> DbResult<Option<String>> {
        self.check("hget")?;
        Ok(self
            .inner
            .hashes
            .read()
            .get(key)
            .and_then(|fvs| fvs.get(field).cloned()))
    }

    async fn hgetall(&self, key: &str) -> DbResult<FieldValues> {
        self.check("hgetall")?;
        Ok(self
            .inner
            .hashes
            .read()
            .get(key)
            .map(|fvs| {
                let mut fvs: FieldValues =
                    fvs.iter().map(|(f, v)| (f.clone(), v.clone())).collect();
                fvs.sort();
                fvs
            })
            .unwrap_or_default())
    }

    async fn keys(&self, pattern: &str) -> DbResult<Vec<String>> {
        self.check("keys")?;
        Ok(self
            .inner
            .hashes
            .read()
            .keys()
            .filter(|k| glob_match(pattern, k))
            .cloned()
            .collect())
    }

    async fn publish(&self, channel: &str, message: &str) -> DbResult<()> {
        self.check("publish")?;
        self.inner
            .published
            .write()
            .push((channel.to_string(), message.to_string()));
        Ok(())
    }
}

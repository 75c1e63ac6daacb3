//! The chained hash table.
//!
//! [`KeyValueTable`] keeps a `Vec` of buckets. Each bucket is a chain of
//! entries whose keys hash to that bucket for the current capacity. The most
//! recently inserted entry is the head of its chain and is stored at the end
//! of the bucket's `Vec`, so pushing a new head never shifts existing entries.

use std::fmt;
use std::iter::{FusedIterator, Rev};
use std::slice;

use tracing::{debug, trace};

use crate::error::{TableError, TableResult};
use crate::hash::{bucket_index, djb2};

/// Bucket count used when the caller does not suggest one.
pub const DEFAULT_CAPACITY: usize = 16;

/// Maximum load factor, kept as an integer ratio (3 / 4 = 0.75).
const MAX_LOAD_NUMERATOR: usize = 3;
const MAX_LOAD_DENOMINATOR: usize = 4;

/// One stored association.
///
/// The key's hash is cached so a resize only recomputes the bucket index.
#[derive(Debug)]
struct Entry {
    hash: u32,
    key: String,
    value: String,
}

/// Entries sharing a bucket. The chain head is the last element.
type Chain = Vec<Entry>;

/// A string-to-string hash table with separate chaining.
///
/// Keys are unique: inserting an existing key replaces its value. The table
/// doubles its bucket count before any insert that would take the load
/// factor above 0.75, and every entry is rehashed into the new buckets.
///
/// The table is single-threaded; see [`SharedTable`](crate::SharedTable)
/// for a lock-guarded variant.
pub struct KeyValueTable {
    buckets: Vec<Chain>,
    size: usize,
}

impl KeyValueTable {
    /// Create a table with [`DEFAULT_CAPACITY`] buckets.
    pub fn new() -> TableResult<Self> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a table with `capacity_hint` buckets.
    ///
    /// A hint of zero falls back to [`DEFAULT_CAPACITY`].
    pub fn with_capacity(capacity_hint: usize) -> TableResult<Self> {
        let capacity = if capacity_hint == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity_hint
        };
        Ok(Self {
            buckets: alloc_buckets(capacity)?,
            size: 0,
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Ratio of live entries to buckets.
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Insert `key` with `value`, replacing the value if the key exists.
    ///
    /// The table grows first if one more entry would exceed the load
    /// factor, so capacity may change even when the key is already present.
    pub fn insert(&mut self, key: &str, value: &str) -> TableResult<()> {
        while exceeds_max_load(self.size.saturating_add(1), self.capacity()) {
            self.grow()?;
        }

        let hash = djb2(key.as_bytes());
        let index = bucket_index(hash, self.capacity());

        if let Some(entry) = self.buckets[index].iter_mut().find(|e| e.key == key) {
            entry.value = copy_str(value)?;
            return Ok(());
        }

        let entry = Entry {
            hash,
            key: copy_str(key)?,
            value: copy_str(value)?,
        };
        let chain = &mut self.buckets[index];
        chain.try_reserve(1)?;
        chain.push(entry);
        self.size += 1;
        trace!(bucket = index, size = self.size, "entry inserted");
        Ok(())
    }

    /// Insert every `(key, value)` pair in order.
    ///
    /// Stops at the first failure; pairs inserted before it stay in the table.
    pub fn insert_all<I, K, V>(&mut self, pairs: I) -> TableResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in pairs {
            self.insert(key.as_ref(), value.as_ref())?;
        }
        Ok(())
    }

    /// Look up the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.chain_for(key)
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key` from the table.
    ///
    /// Returns `true` if an entry was removed. Removing an absent key is a
    /// no-op.
    pub fn delete(&mut self, key: &str) -> bool {
        let index = bucket_index(djb2(key.as_bytes()), self.capacity());
        let chain = &mut self.buckets[index];
        match chain.iter().position(|e| e.key == key) {
            Some(pos) => {
                chain.remove(pos);
                self.size -= 1;
                trace!(bucket = index, size = self.size, "entry removed");
                true
            }
            None => false,
        }
    }

    /// Copy out every stored value, in bucket-then-chain order.
    pub fn values(&self) -> TableResult<Vec<String>> {
        let mut values = Vec::new();
        values.try_reserve_exact(self.size)?;
        for (_, value) in self.iter() {
            values.push(copy_str(value)?);
        }
        Ok(values)
    }

    /// Iterate over the stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Iterate over `(key, value)` pairs, visiting each entry exactly once.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.buckets.iter(),
            chain: <&[Entry]>::default().iter().rev(),
            remaining: self.size,
        }
    }

    fn chain_for(&self, key: &str) -> &Chain {
        &self.buckets[bucket_index(djb2(key.as_bytes()), self.capacity())]
    }

    /// Double the bucket count and move every entry to its new bucket.
    ///
    /// All memory is reserved before any entry moves, so a failed grow
    /// leaves the table untouched.
    fn grow(&mut self) -> TableResult<()> {
        let old_capacity = self.capacity();
        let new_capacity = doubled(old_capacity)?;

        let mut counts: Vec<usize> = Vec::new();
        counts.try_reserve_exact(new_capacity)?;
        counts.resize(new_capacity, 0);
        for entry in self.buckets.iter().flatten() {
            counts[bucket_index(entry.hash, new_capacity)] += 1;
        }

        let mut buckets = alloc_buckets(new_capacity)?;
        for (chain, count) in buckets.iter_mut().zip(&counts) {
            chain.try_reserve_exact(*count)?;
        }

        // Walk each old chain head first and push onto the new chain head.
        for old_chain in std::mem::take(&mut self.buckets) {
            for entry in old_chain.into_iter().rev() {
                let index = bucket_index(entry.hash, new_capacity);
                buckets[index].push(entry);
            }
        }
        self.buckets = buckets;

        debug!(
            old_capacity,
            new_capacity,
            size = self.size,
            "table resized"
        );
        Ok(())
    }
}

impl fmt::Debug for KeyValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyValueTable")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Debug dump: one `key, value` line per entry.
impl fmt::Display for KeyValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{key}, {value}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a KeyValueTable {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`KeyValueTable`].
///
/// Created by [`KeyValueTable::iter`].
pub struct Iter<'a> {
    buckets: slice::Iter<'a, Chain>,
    chain: Rev<slice::Iter<'a, Entry>>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.next() {
                self.remaining -= 1;
                return Some((entry.key.as_str(), entry.value.as_str()));
            }
            self.chain = self.buckets.next()?.iter().rev();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

fn doubled(capacity: usize) -> TableResult<usize> {
    capacity
        .checked_mul(2)
        .ok_or(TableError::CapacityOverflow { capacity })
}

fn exceeds_max_load(size: usize, capacity: usize) -> bool {
    size.saturating_mul(MAX_LOAD_DENOMINATOR) > capacity.saturating_mul(MAX_LOAD_NUMERATOR)
}

fn alloc_buckets(capacity: usize) -> TableResult<Vec<Chain>> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.resize_with(capacity, Vec::new);
    Ok(buckets)
}

fn copy_str(s: &str) -> TableResult<String> {
    let mut owned = String::new();
    owned.try_reserve_exact(s.len())?;
    owned.push_str(s);
    Ok(owned)
}

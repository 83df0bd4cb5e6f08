//! LRU Core Module
//!
//! Arena-backed doubly linked recency list plus a key index.
//!
//! Nodes live in a `Vec` and link to each other by slot index, so the list has
//! no owning pointer cycles. Evicted slots go on a free list and are reused by
//! the next insertion.

use std::collections::HashMap;
use std::num::NonZeroUsize;

type Slot = usize;

// == Node ==
#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    /// Neighbour towards the head (more recently used)
    prev: Option<Slot>,
    /// Neighbour towards the tail (less recently used)
    next: Option<Slot>,
}

// == Put Outcome ==
/// What a `put` did to the structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// Key existed; value replaced and promoted
    Updated,
    /// Key was new and inserted at the head
    Inserted {
        /// Key evicted from the tail to make room, if any
        evicted: Option<String>,
    },
}

// == LRU Core ==
/// Bounded key→value map with strict least-recently-used eviction.
///
/// Not synchronized; `CacheEngine` wraps it in a single mutex.
#[derive(Debug)]
pub struct LruCore<V> {
    nodes: Vec<Node<V>>,
    free: Vec<Slot>,
    index: HashMap<String, Slot>,
    /// Most recently used
    head: Option<Slot>,
    /// Least recently used
    tail: Option<Slot>,
    capacity: NonZeroUsize,
}

impl<V> LruCore<V> {
    // == Constructor ==
    /// Creates an empty core holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity.get()),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity.get()),
            head: None,
            tail: None,
            capacity,
        }
    }

    // == Get ==
    /// Returns the value for `key` and promotes it to most recently used.
    ///
    /// A miss leaves the structure untouched.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.move_to_head(slot);
        Some(&self.nodes[slot].value)
    }

    // == Put ==
    /// Inserts or overwrites `key`, leaving it at the head.
    ///
    /// Inserting a new key into a full core evicts the tail first, so the
    /// length never exceeds capacity.
    pub fn put(&mut self, key: String, value: V) -> PutOutcome {
        if let Some(&slot) = self.index.get(&key) {
            self.nodes[slot].value = value;
            self.move_to_head(slot);
            return PutOutcome::Updated;
        }

        let evicted = if self.index.len() >= self.capacity.get() {
            self.evict_tail()
        } else {
            None
        };

        let slot = self.alloc(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.index.insert(key, slot);
        self.push_head(slot);

        PutOutcome::Inserted { evicted }
    }

    // == Introspection ==
    /// Returns true if `key` is cached. Does not touch recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            keys.push(self.nodes[slot].key.clone());
            cursor = self.nodes[slot].next;
        }
        keys
    }

    /// Walks the list and checks it against the index.
    ///
    /// Holds when every listed key maps back to its own slot, the links are
    /// symmetric, the walk visits exactly `index.len()` nodes and the size is
    /// within capacity.
    pub fn is_consistent(&self) -> bool {
        let mut visited = 0usize;
        let mut prev: Option<Slot> = None;
        let mut cursor = self.head;

        while let Some(slot) = cursor {
            let node = &self.nodes[slot];
            if node.prev != prev || self.index.get(&node.key) != Some(&slot) {
                return false;
            }
            visited += 1;
            if visited > self.index.len() {
                return false;
            }
            prev = Some(slot);
            cursor = node.next;
        }

        prev == self.tail && visited == self.index.len() && visited <= self.capacity.get()
    }

    // == Arena ==
    fn alloc(&mut self, node: Node<V>) -> Slot {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    // == List Operations ==
    fn detach(&mut self, slot: Slot) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);

        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }

        self.nodes[slot].prev = None;
        self.nodes[slot].next = None;
    }

    fn push_head(&mut self, slot: Slot) {
        self.nodes[slot].prev = None;
        self.nodes[slot].next = self.head;

        if let Some(old) = self.head {
            self.nodes[old].prev = Some(slot);
        }
        self.head = Some(slot);

        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    fn move_to_head(&mut self, slot: Slot) {
        if self.head == Some(slot) {
            return;
        }
        self.detach(slot);
        self.push_head(slot);
    }

    /// Unlinks the tail, drops it from the index and frees its slot.
    fn evict_tail(&mut self) -> Option<String> {
        let slot = self.tail?;
        self.detach(slot);
        let key = self.nodes[slot].key.clone();
        self.index.remove(&key);
        self.free.push(slot);
        Some(key)
    }
}

//! Double-ended frontier with an optional size ceiling.
//!
//! Entries live in an index arena with a free-list. Each slot sits on two
//! chains: the sequence chain (front to back, what callers push and pop) and
//! the age chain (oldest to newest insertion), so overflow eviction can drop
//! the oldest entries no matter which end they were pushed on.

pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    prev: Option<usize>,
    next: Option<usize>,
    older: Option<usize>,
    newer: Option<usize>,
}

#[derive(Debug)]
pub struct BoundedDeque<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    oldest: Option<usize>,
    newest: Option<usize>,
    len: usize,
    capacity: Option<usize>,
    batch_size: usize,
    evicted: u64,
}

impl<T> Default for BoundedDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BoundedDeque<T> {
    /// Unbounded deque.
    pub fn new() -> Self {
        Self::with_capacity(None, DEFAULT_BATCH_SIZE)
    }

    /// `capacity` and `batch_size` are clamped to at least 1.
    pub fn with_capacity(capacity: Option<usize>, batch_size: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            oldest: None,
            newest: None,
            len: 0,
            capacity: capacity.map(|c| c.max(1)),
            batch_size: batch_size.max(1),
            evicted: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Entries dropped by overflow eviction since construction or the last
    /// [`clear`](Self::clear).
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn push_front(&mut self, value: T) {
        let idx = self.alloc(value);
        self.slots[idx].next = self.head;
        match self.head {
            Some(head) => self.slots[head].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.enforce_capacity();
    }

    pub fn push_back(&mut self, value: T) {
        let idx = self.alloc(value);
        self.slots[idx].prev = self.tail;
        match self.tail {
            Some(tail) => self.slots[tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.enforce_capacity();
    }

    /// `None` when empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let idx = self.head?;
        self.remove(idx)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let idx = self.tail?;
        self.remove(idx)
    }

    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|idx| self.slots[idx].value.as_ref())
    }

    /// Front-to-back iteration.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let idx = cursor?;
            let slot = &self.slots[idx];
            cursor = slot.next;
            slot.value.as_ref()
        })
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.oldest = None;
        self.newest = None;
        self.len = 0;
        self.evicted = 0;
    }

    fn alloc(&mut self, value: T) -> usize {
        let slot = Slot {
            value: Some(value),
            prev: None,
            next: None,
            older: self.newest,
            newer: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = slot;
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };

        match self.newest {
            Some(newest) => self.slots[newest].newer = Some(idx),
            None => self.oldest = Some(idx),
        }
        self.newest = Some(idx);
        self.len += 1;
        idx
    }

    fn remove(&mut self, idx: usize) -> Option<T> {
        let (prev, next, older, newer) = {
            let slot = &self.slots[idx];
            (slot.prev, slot.next, slot.older, slot.newer)
        };

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        match older {
            Some(o) => self.slots[o].newer = newer,
            None => self.oldest = newer,
        }
        match newer {
            Some(n) => self.slots[n].older = older,
            None => self.newest = older,
        }

        let slot = &mut self.slots[idx];
        let value = slot.value.take();
        slot.prev = None;
        slot.next = None;
        slot.older = None;
        slot.newer = None;
        self.free.push(idx);
        self.len -= 1;
        value
    }

    fn enforce_capacity(&mut self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        if self.len <= capacity {
            return;
        }

        let count = (self.len - capacity).min(self.batch_size);
        for _ in 0..count {
            if let Some(oldest) = self.oldest {
                self.remove(oldest);
            }
        }
        self.evicted += count as u64;
        tracing::debug!(count, len = self.len, capacity, "evicted oldest frontier entries");
    }
}

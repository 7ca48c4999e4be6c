//! ElementStore: arena of pairs threaded into a doubly-linked order list.
//!
//! Slots are generational `slotmap` keys, so a slot identifier stays valid
//! for exactly as long as its pair lives and is never reused for a later
//! pair. New pairs are linked at the head.

use core::ops::{Index, IndexMut};
use slotmap::{DefaultKey, SecondaryMap, SlotMap};

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    pub(crate) prev: Option<DefaultKey>,
    pub(crate) next: Option<DefaultKey>,
}

#[derive(Debug)]
pub(crate) struct ElementStore<K, V> {
    slots: SlotMap<DefaultKey, Node<K, V>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<K, V> ElementStore<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn head(&self) -> Option<DefaultKey> {
        self.head
    }

    pub(crate) fn get(&self, slot: DefaultKey) -> Option<&Node<K, V>> {
        self.slots.get(slot)
    }

    pub(crate) fn get_mut(&mut self, slot: DefaultKey) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(slot)
    }

    /// Link a new pair in front of the current head and return its slot.
    pub(crate) fn push_front(&mut self, key: K, value: V, hash: u64) -> DefaultKey {
        let next = self.head;
        let slot = self.slots.insert(Node {
            key,
            value,
            hash,
            prev: None,
            next,
        });
        match next {
            Some(n) => self.slots[n].prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        slot
    }

    /// Remove a pair from the arena and splice its neighbours together.
    pub(crate) fn unlink(&mut self, slot: DefaultKey) -> Option<Node<K, V>> {
        let node = self.slots.remove(slot)?;
        match node.prev {
            Some(p) => self.slots[p].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => self.slots[n].prev = node.prev,
            None => self.tail = node.prev,
        }
        Some(node)
    }

    pub(crate) fn pop_front(&mut self) -> Option<Node<K, V>> {
        let slot = self.head?;
        self.unlink(slot)
    }

    pub(crate) fn pop_back(&mut self) -> Option<Node<K, V>> {
        let slot = self.tail?;
        self.unlink(slot)
    }

    pub(crate) fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.slots.clear();
    }

    pub(crate) fn links(&self) -> Links<'_, K, V> {
        Links {
            slots: &self.slots,
            front: self.head,
            back: self.tail,
            remaining: self.slots.len(),
        }
    }

    /// Split every node into disjoint `&K`/`&mut V` borrows keyed by slot so
    /// they can be handed out in list order. O(len) time and one
    /// `SecondaryMap` allocation before the first node is yielded.
    pub(crate) fn links_mut(&mut self) -> LinksMut<'_, K, V> {
        let front = self.head;
        let back = self.tail;
        let remaining = self.slots.len();
        let mut nodes = SecondaryMap::with_capacity(remaining);
        for (slot, node) in self.slots.iter_mut() {
            let Node {
                key,
                value,
                prev,
                next,
                ..
            } = node;
            nodes.insert(
                slot,
                NodeMut {
                    key,
                    value,
                    prev: *prev,
                    next: *next,
                },
            );
        }
        LinksMut {
            nodes,
            front,
            back,
            remaining,
        }
    }
}

impl<K, V> Index<DefaultKey> for ElementStore<K, V> {
    type Output = Node<K, V>;

    fn index(&self, slot: DefaultKey) -> &Node<K, V> {
        &self.slots[slot]
    }
}

impl<K, V> IndexMut<DefaultKey> for ElementStore<K, V> {
    fn index_mut(&mut self, slot: DefaultKey) -> &mut Node<K, V> {
        &mut self.slots[slot]
    }
}

/// Walks the order list from both ends; stops once every node was yielded.
pub(crate) struct Links<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Node<K, V>>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<K, V> Clone for Links<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Links<'a, K, V> {
    type Item = (DefaultKey, &'a Node<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front?;
        let node = self.slots.get(slot)?;
        self.front = node.next;
        self.remaining -= 1;
        Some((slot, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Links<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.back?;
        let node = self.slots.get(slot)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some((slot, node))
    }
}

pub(crate) struct NodeMut<'a, K, V> {
    pub(crate) key: &'a K,
    pub(crate) value: &'a mut V,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

pub(crate) struct LinksMut<'a, K, V> {
    nodes: SecondaryMap<DefaultKey, NodeMut<'a, K, V>>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for LinksMut<'a, K, V> {
    type Item = NodeMut<'a, K, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.remove(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for LinksMut<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.remove(self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(node)
    }
}

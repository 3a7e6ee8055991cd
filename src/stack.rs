//! Layered page stack state
//!
//! Entries live in an arena keyed by [`PageKey`]; the stack structure only
//! holds ordered lists of keys. Layer 0 is the root layer and always exists;
//! every other layer was opened by a presentation and holds at least one
//! page.
//!
//! Removal operations return the removed entries topmost first, which is
//! the order they must be torn down in.

use crate::page::PageKey;
use std::collections::HashMap;

/// Arena of entries plus the layer structure referencing them.
#[derive(Debug)]
pub(crate) struct PageStack<T> {
    entries: HashMap<PageKey, T>,
    layers: Vec<Vec<PageKey>>,
}

impl<T> PageStack<T> {
    /// Create a stack with an empty root layer.
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            layers: vec![Vec::new()],
        }
    }

    /// Snapshot of the layer structure, root layer first.
    pub(crate) fn layers(&self) -> &[Vec<PageKey>] {
        &self.layers
    }

    pub(crate) fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Index of the top layer.
    pub(crate) fn top_layer_index(&self) -> usize {
        self.layers.len() - 1
    }

    /// Keys of the top layer, bottom first.
    pub(crate) fn top_layer(&self) -> &[PageKey] {
        self.layers.last().map_or(&[], Vec::as_slice)
    }

    /// The page receiving interaction: top of the top layer.
    pub(crate) fn current(&self) -> Option<PageKey> {
        self.top_layer().last().copied()
    }

    /// The absolute root page.
    pub(crate) fn root(&self) -> Option<PageKey> {
        self.layers.first().and_then(|layer| layer.first()).copied()
    }

    pub(crate) fn get(&self, key: PageKey) -> Option<&T> {
        self.entries.get(&key)
    }

    pub(crate) fn get_mut(&mut self, key: PageKey) -> Option<&mut T> {
        self.entries.get_mut(&key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Position of `key` within the top layer.
    pub(crate) fn position_in_top_layer(&self, key: PageKey) -> Option<usize> {
        self.top_layer().iter().position(|k| *k == key)
    }

    /// Locate `key` as `(layer, index)`.
    pub(crate) fn locate(&self, key: PageKey) -> Option<(usize, usize)> {
        self.layers.iter().enumerate().find_map(|(layer, keys)| {
            keys.iter()
                .position(|k| *k == key)
                .map(|index| (layer, index))
        })
    }

    /// Slot the next pushed page will occupy.
    pub(crate) fn next_push_slot(&self) -> (usize, usize) {
        (self.top_layer_index(), self.top_layer().len())
    }

    /// Append a page to the top layer. Returns its `(layer, index)`.
    pub(crate) fn push(&mut self, key: PageKey, entry: T) -> (usize, usize) {
        let slot = self.next_push_slot();
        self.entries.insert(key, entry);
        if let Some(layer) = self.layers.last_mut() {
            layer.push(key);
        }
        slot
    }

    /// Open a new layer holding one page. Returns the new layer's index.
    pub(crate) fn push_layer(&mut self, key: PageKey, entry: T) -> usize {
        self.entries.insert(key, entry);
        self.layers.push(vec![key]);
        self.top_layer_index()
    }

    /// Remove every page of the top layer from `index` upward.
    ///
    /// Index 0 is the bottom of the layer and is never removed; asking for
    /// it, or for an index past the end, removes nothing.
    pub(crate) fn truncate_top_layer(&mut self, index: usize) -> Vec<(PageKey, T)> {
        let Some(layer) = self.layers.last_mut() else {
            return Vec::new();
        };
        if index == 0 || index >= layer.len() {
            return Vec::new();
        }
        let removed: Vec<PageKey> = layer.drain(index..).rev().collect();
        removed
            .into_iter()
            .filter_map(|key| self.entries.remove(&key).map(|entry| (key, entry)))
            .collect()
    }

    /// Close the top layer. The root layer is never closed.
    pub(crate) fn pop_layer(&mut self) -> Vec<(PageKey, T)> {
        if self.layers.len() <= 1 {
            return Vec::new();
        }
        let layer = self.layers.pop().unwrap_or_default();
        layer
            .into_iter()
            .rev()
            .filter_map(|key| self.entries.remove(&key).map(|entry| (key, entry)))
            .collect()
    }

    /// Swap the entry at `old`'s position for a new one, keeping the index.
    pub(crate) fn replace(&mut self, old: PageKey, new: PageKey, entry: T) -> Option<T> {
        let (layer, index) = self.locate(old)?;
        let previous = self.entries.remove(&old)?;
        self.layers[layer][index] = new;
        self.entries.insert(new, entry);
        Some(previous)
    }

    /// Remove everything, root layer included. Entries come back topmost first.
    pub(crate) fn clear(&mut self) -> Vec<(PageKey, T)> {
        let keys: Vec<PageKey> = self.flattened().into_iter().rev().collect();
        self.layers = vec![Vec::new()];
        keys.into_iter()
            .filter_map(|key| self.entries.remove(&key).map(|entry| (key, entry)))
            .collect()
    }

    /// All keys across all layers, bottom of the root layer first.
    pub(crate) fn flattened(&self) -> Vec<PageKey> {
        self.layers.iter().flatten().copied().collect()
    }
}

/// Which pages are visible once no animation is running.
///
/// `transparent` lists every page bottom first. The top page is visible,
/// and a page is visible while every page above it up to the top is
/// transparent.
pub(crate) fn resting_visibility(transparent: &[bool]) -> Vec<bool> {
    let mut visible = vec![false; transparent.len()];
    let mut reveal = true;
    for (index, is_transparent) in transparent.iter().enumerate().rev() {
        visible[index] = reveal;
        reveal = reveal && *is_transparent;
    }
    visible
}

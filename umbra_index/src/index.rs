// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::backend::Backend;
use crate::backends::FlatVec;
use crate::types::Aabb2D;

/// Generational handle for entries.
///
/// A key stays valid until its entry is removed. Keys of removed entries
/// never alias a later insertion into the same slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Slot indices are stored as u32; an index never holds 2^32 live entries."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Entry<T, P> {
    generation: u32,
    aabb: Aabb2D<T>,
    payload: P,
}

/// A generic AABB index parameterized by a spatial backend.
///
/// Every mutation is forwarded to the backend immediately, so queries always
/// see the current state.
#[derive(Debug)]
pub struct IndexGeneric<T: Copy + PartialOrd + Debug, P: Copy + Debug, B: Backend<T>> {
    entries: Vec<Option<Entry<T, P>>>,
    // Generation of the last occupant of each vacant slot.
    retired: Vec<(usize, u32)>,
    live: usize,
    backend: B,
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T>,
{
    /// Create an empty index using an explicit, possibly preconfigured, backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            retired: Vec::new(),
            live: 0,
            backend,
        }
    }

    /// Reserve space for at least `n` more entries.
    pub fn reserve(&mut self, n: usize) {
        self.entries.reserve(n);
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Insert a new AABB with payload. Returns a stable handle `Key`.
    pub fn insert(&mut self, aabb: Aabb2D<T>, payload: P) -> Key {
        let (idx, generation) = match self.retired.pop() {
            Some((idx, last)) => (idx, last.wrapping_add(1)),
            None => {
                self.entries.push(None);
                (self.entries.len() - 1, 1)
            }
        };
        self.entries[idx] = Some(Entry {
            generation,
            aabb,
            payload,
        });
        self.backend.insert(idx, aabb);
        self.live += 1;
        Key::new(idx, generation)
    }

    /// Replace the AABB of an existing entry.
    ///
    /// Returns `false` when `key` is stale.
    pub fn update(&mut self, key: Key, aabb: Aabb2D<T>) -> bool {
        let Some(e) = self.entry_mut(key) else {
            return false;
        };
        if e.aabb != aabb {
            e.aabb = aabb;
            self.backend.update(key.idx(), aabb);
        }
        true
    }

    /// Replace the payload of an existing entry.
    ///
    /// Returns `false` when `key` is stale.
    pub fn set_payload(&mut self, key: Key, payload: P) -> bool {
        match self.entry_mut(key) {
            Some(e) => {
                e.payload = payload;
                true
            }
            None => false,
        }
    }

    /// Remove an entry, returning its payload when `key` was live.
    pub fn remove(&mut self, key: Key) -> Option<P> {
        let generation = self.entry_mut(key)?.generation;
        let entry = self.entries[key.idx()].take()?;
        self.backend.remove(key.idx());
        self.retired.push((key.idx(), generation));
        self.live -= 1;
        Some(entry.payload)
    }

    /// Look up the AABB and payload of a live entry.
    pub fn get(&self, key: Key) -> Option<(Aabb2D<T>, P)> {
        let e = self.entries.get(key.idx())?.as_ref()?;
        (e.generation == key.1).then_some((e.aabb, e.payload))
    }

    /// Remove every entry.
    ///
    /// Keys handed out before the clear are not guaranteed to stay stale.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.retired.clear();
        self.live = 0;
        self.backend.clear();
    }

    /// Collect entries whose AABB contains the point.
    pub fn query_point(&self, x: T, y: T) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut out = Vec::new();
        let _ = self.visit_point(x, y, |k, p| {
            out.push((k, p));
            ControlFlow::Continue(())
        });
        out.into_iter()
    }

    /// Visit entries whose AABB contains the point without allocating.
    ///
    /// Return [`ControlFlow::Break`] from `f` to stop early. The order is
    /// backend-dependent.
    pub fn visit_point<F>(&self, x: T, y: T, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Key, P) -> ControlFlow<()>,
    {
        self.backend.visit_point(x, y, |i| self.forward(i, &mut f))
    }

    /// Collect entries whose AABB overlaps the rectangle.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut out = Vec::new();
        let _ = self.visit_rect(rect, |k, p| {
            out.push((k, p));
            ControlFlow::Continue(())
        });
        out.into_iter()
    }

    /// Visit entries whose AABB overlaps the rectangle without allocating.
    ///
    /// Return [`ControlFlow::Break`] from `f` to stop early. The order is
    /// backend-dependent.
    pub fn visit_rect<F>(&self, rect: Aabb2D<T>, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(Key, P) -> ControlFlow<()>,
    {
        self.backend.visit_rect(rect, |i| self.forward(i, &mut f))
    }

    fn forward<F>(&self, slot: usize, f: &mut F) -> ControlFlow<()>
    where
        F: FnMut(Key, P) -> ControlFlow<()>,
    {
        match self.entries.get(slot) {
            Some(Some(e)) => f(Key::new(slot, e.generation), e.payload),
            _ => ControlFlow::Continue(()),
        }
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<T, P>> {
        let e = self.entries.get_mut(key.idx())?.as_mut()?;
        if e.generation != key.1 {
            return None;
        }
        Some(e)
    }
}

/// Default index using a flat vector backend.
pub type Index<T, P> = IndexGeneric<T, P, FlatVec<T>>;

impl<T: Copy + PartialOrd + Debug, P: Copy + Debug> Default for Index<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "backend_grid")]
impl<P: Copy + Debug> Index<f64, P> {
    /// Create a grid-backed index with the given cell size.
    pub fn with_grid(cell_size: f64) -> IndexGeneric<f64, P, crate::backends::GridF64> {
        IndexGeneric::with_backend(crate::backends::GridF64::new(cell_size))
    }
}

#[cfg(feature = "backend_grid")]
impl<P: Copy + Debug> Index<f32, P> {
    /// Create a grid-backed index with the given cell size.
    pub fn with_grid(cell_size: f32) -> IndexGeneric<f32, P, crate::backends::GridF32> {
        IndexGeneric::with_backend(crate::backends::GridF32::new(cell_size))
    }
}

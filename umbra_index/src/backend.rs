// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::types::Aabb2D;

/// Spatial backend abstraction used by [`IndexGeneric`][crate::IndexGeneric].
///
/// Slots are dense `usize` ids owned by the index; a backend only maps boxes
/// to slots. Visitors return [`ControlFlow`] so callers can stop a query as
/// soon as they have what they need, and the visit reports whether it was
/// cut short.
pub trait Backend<T: Copy + PartialOrd + Debug> {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Update an existing slot's AABB. Updating an unknown slot inserts it.
    fn update(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Remove a slot from the spatial structure.
    fn remove(&mut self, slot: usize);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Visit slots whose AABB contains the point.
    fn visit_point<F: FnMut(usize) -> ControlFlow<()>>(&self, x: T, y: T, f: F)
    -> ControlFlow<()>;

    /// Visit slots whose AABB overlaps the rectangle.
    ///
    /// Each matching slot is reported exactly once.
    fn visit_rect<F: FnMut(usize) -> ControlFlow<()>>(
        &self,
        rect: Aabb2D<T>,
        f: F,
    ) -> ControlFlow<()>;
}

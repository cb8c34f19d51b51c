// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend for 2D AABBs.
//!
//! Every box is registered in each fixed-size cell it touches. A rectangle
//! query walks only the cells under the rectangle and reports every slot
//! once, even when a large collider spans many of those cells.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::backend::Backend;
use crate::types::{Aabb2D, Scalar};

/// Scalar types supported by the grid backend.
pub trait GridScalar: Scalar {
    /// Map a coordinate to a cell coordinate along one axis, rounding toward
    /// negative infinity and saturating at the `i32` range.
    fn cell_coord(value: Self, origin: Self, cell_size: Self) -> i32;
}

macro_rules! float_grid_scalar {
    ($t:ty) => {
        impl GridScalar for $t {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Cell indices are i32; float-to-int casts saturate."
            )]
            #[inline]
            fn cell_coord(value: Self, origin: Self, cell_size: Self) -> i32 {
                debug_assert!(cell_size > 0.0, "grid cell_size must be positive");
                let t = (value - origin) / cell_size;
                let truncated = t as i32;
                if t < 0.0 && (truncated as Self) > t {
                    truncated.saturating_sub(1)
                } else {
                    truncated
                }
            }
        }
    };
}

float_grid_scalar!(f32);
float_grid_scalar!(f64);

impl GridScalar for i64 {
    #[inline]
    fn cell_coord(value: Self, origin: Self, cell_size: Self) -> i32 {
        debug_assert!(cell_size > 0, "grid cell_size must be positive");
        let coord = (value - origin).div_euclid(cell_size);
        i32::try_from(coord).unwrap_or(if coord < 0 { i32::MIN } else { i32::MAX })
    }
}

type CellKey = (i32, i32);

/// Uniform grid backend with fixed cell size.
pub struct Grid<T: GridScalar> {
    cell_size: T,
    origin: (T, T),
    cells: HashMap<CellKey, SmallVec<[usize; 8]>>,
    slots: Vec<Option<Registered<T>>>,
}

#[derive(Clone, Debug)]
struct Registered<T> {
    aabb: Aabb2D<T>,
    cells: SmallVec<[CellKey; 4]>,
}

impl<T: GridScalar> Debug for Grid<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("Grid")
            .field("cell_size", &self.cell_size)
            .field("origin", &self.origin)
            .field("live_slots", &live)
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

impl<T: GridScalar> Grid<T> {
    /// Create a grid with the given cell size and origin at (0, 0).
    pub fn new(cell_size: T) -> Self {
        Self::with_origin(cell_size, T::zero(), T::zero())
    }

    /// Create a grid with the given cell size and origin.
    pub fn with_origin(cell_size: T, origin_x: T, origin_y: T) -> Self {
        debug_assert!(cell_size > T::zero(), "cell_size must be strictly positive");
        Self {
            cell_size,
            origin: (origin_x, origin_y),
            cells: HashMap::new(),
            slots: Vec::new(),
        }
    }

    fn cell_span(&self, rect: &Aabb2D<T>) -> ((i32, i32), (i32, i32)) {
        let x0 = T::cell_coord(rect.min_x, self.origin.0, self.cell_size);
        let x1 = T::cell_coord(rect.max_x, self.origin.0, self.cell_size);
        let y0 = T::cell_coord(rect.min_y, self.origin.1, self.cell_size);
        let y1 = T::cell_coord(rect.max_y, self.origin.1, self.cell_size);
        ((x0.min(x1), x0.max(x1)), (y0.min(y1), y0.max(y1)))
    }

    fn register(&mut self, slot: usize, aabb: Aabb2D<T>) {
        let ((x0, x1), (y0, y1)) = self.cell_span(&aabb);
        let mut cells: SmallVec<[CellKey; 4]> = SmallVec::new();
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                self.cells.entry((ix, iy)).or_default().push(slot);
                cells.push((ix, iy));
            }
        }
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(Registered { aabb, cells });
    }

    fn unregister(&mut self, slot: usize) {
        let Some(old) = self.slots.get_mut(slot).and_then(Option::take) else {
            return;
        };
        for key in &old.cells {
            let members = self
                .cells
                .get_mut(key)
                .expect("grid invariant violated: registered cell is missing");
            let pos = members
                .iter()
                .position(|&s| s == slot)
                .expect("grid invariant violated: slot not listed in its cell");
            members.swap_remove(pos);
            if members.is_empty() {
                self.cells.remove(key);
            }
        }
    }

    fn aabb_of(&self, slot: usize) -> &Aabb2D<T> {
        &self.slots[slot]
            .as_ref()
            .expect("grid invariant violated: cell lists a vacant slot")
            .aabb
    }
}

impl<T: GridScalar> Backend<T> for Grid<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        self.unregister(slot);
        self.register(slot, aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if matches!(self.slots.get(slot), Some(Some(r)) if r.aabb == aabb) {
            return;
        }
        self.unregister(slot);
        self.register(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        self.unregister(slot);
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.slots.clear();
    }

    fn visit_point<F: FnMut(usize) -> ControlFlow<()>>(
        &self,
        x: T,
        y: T,
        mut f: F,
    ) -> ControlFlow<()> {
        let key = (
            T::cell_coord(x, self.origin.0, self.cell_size),
            T::cell_coord(y, self.origin.1, self.cell_size),
        );
        if let Some(members) = self.cells.get(&key) {
            for &slot in members {
                if self.aabb_of(slot).contains_point(x, y) {
                    f(slot)?;
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn visit_rect<F: FnMut(usize) -> ControlFlow<()>>(
        &self,
        rect: Aabb2D<T>,
        mut f: F,
    ) -> ControlFlow<()> {
        let ((x0, x1), (y0, y1)) = self.cell_span(&rect);
        let mut reported: HashSet<usize> = HashSet::new();
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                let Some(members) = self.cells.get(&(ix, iy)) else {
                    continue;
                };
                for &slot in members {
                    if reported.insert(slot) && self.aabb_of(slot).overlaps(&rect) {
                        f(slot)?;
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }
}

/// Grid backend over `f32` coordinates.
pub type GridF32 = Grid<f32>;
/// Grid backend over `f64` coordinates.
pub type GridF64 = Grid<f64>;
/// Grid backend over `i64` coordinates.
pub type GridI64 = Grid<i64>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn collect_rect<T: GridScalar>(grid: &Grid<T>, rect: Aabb2D<T>) -> Vec<usize> {
        let mut hits = Vec::new();
        let _ = grid.visit_rect(rect, |s| {
            hits.push(s);
            ControlFlow::Continue(())
        });
        hits.sort_unstable();
        hits
    }

    #[test]
    fn wall_spanning_many_cells_is_reported_once() {
        let mut grid = GridF64::new(4.0);
        // A long wall crossing a dozen cells.
        grid.insert(3, Aabb2D::new(-20.0, -1.0, 20.0, 1.0));
        grid.insert(5, Aabb2D::new(30.0, 30.0, 31.0, 31.0));

        assert_eq!(collect_rect(&grid, Aabb2D::new(-10.0, -10.0, 10.0, 10.0)), vec![3]);
        assert_eq!(
            collect_rect(&grid, Aabb2D::new(-40.0, -40.0, 40.0, 40.0)),
            vec![3, 5]
        );
    }

    #[test]
    fn update_moves_membership_and_remove_clears_it() {
        let mut grid = GridF64::new(10.0);
        grid.insert(0, Aabb2D::new(0.0, 0.0, 5.0, 5.0));
        grid.update(0, Aabb2D::new(-25.0, -25.0, -21.0, -21.0));

        assert!(collect_rect(&grid, Aabb2D::new(0.0, 0.0, 5.0, 5.0)).is_empty());
        assert_eq!(
            collect_rect(&grid, Aabb2D::new(-30.0, -30.0, -20.0, -20.0)),
            vec![0]
        );

        grid.remove(0);
        assert!(collect_rect(&grid, Aabb2D::new(-30.0, -30.0, -20.0, -20.0)).is_empty());
        assert!(grid.cells.is_empty(), "empty cells are dropped");
    }

    #[test]
    fn update_of_unknown_slot_inserts() {
        let mut grid = GridI64::new(8);
        grid.update(9, Aabb2D::new(-30, -30, -10, -10));
        let mut hits = Vec::new();
        let _ = grid.visit_point(-20, -20, |s| {
            hits.push(s);
            ControlFlow::Continue(())
        });
        assert_eq!(hits, vec![9]);
    }

    #[test]
    fn visit_rect_stops_when_asked() {
        let mut grid = GridF32::new(1.0);
        for slot in 0..10 {
            let x = slot as f32;
            grid.insert(slot, Aabb2D::new(x, 0.0, x + 0.5, 0.5));
        }
        let mut calls = 0;
        let flow = grid.visit_rect(Aabb2D::new(0.0, 0.0, 10.0, 1.0), |_| {
            calls += 1;
            if calls == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(calls, 3);
    }

    #[test]
    fn cell_coord_rounds_down_and_saturates() {
        assert_eq!(GridScalar::cell_coord(-0.5_f64, 0.0, 1.0), -1);
        assert_eq!(GridScalar::cell_coord(-1.0_f64, 0.0, 1.0), -1);
        assert_eq!(GridScalar::cell_coord(0.99_f32, 0.0, 1.0), 0);
        assert_eq!(GridScalar::cell_coord(-11_i64, 0, 10), -2);
        assert_eq!(GridScalar::cell_coord(1e20_f64, 0.0, 1.0), i32::MAX);
        assert_eq!(GridScalar::cell_coord(-1e20_f32, 0.0, 1.0), i32::MIN);
        assert_eq!(GridScalar::cell_coord(i64::MAX, 0, 1), i32::MAX);
        assert_eq!(GridScalar::cell_coord(i64::MIN + 1, 0, 1), i32::MIN);
    }
}

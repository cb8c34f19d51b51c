// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend: linear scans over every live slot.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Linear-scan backend.
///
/// Queries touch every slot, so this is only a good fit for small worlds or
/// as a reference when testing other backends. Visit order is slot order.
#[derive(Clone)]
pub struct FlatVec<T> {
    slots: Vec<Option<Aabb2D<T>>>,
}

impl<T> Default for FlatVec<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Debug> Debug for FlatVec<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("FlatVec")
            .field("total_slots", &self.slots.len())
            .field("live_slots", &live)
            .finish_non_exhaustive()
    }
}

impl<T: Copy + PartialOrd + Debug> Backend<T> for FlatVec<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some(aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<T>) {
        self.insert(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = None;
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
    }

    fn visit_point<F: FnMut(usize) -> ControlFlow<()>>(
        &self,
        x: T,
        y: T,
        mut f: F,
    ) -> ControlFlow<()> {
        for (slot, aabb) in self.slots.iter().enumerate() {
            if let Some(aabb) = aabb
                && aabb.contains_point(x, y)
            {
                f(slot)?;
            }
        }
        ControlFlow::Continue(())
    }

    fn visit_rect<F: FnMut(usize) -> ControlFlow<()>>(
        &self,
        rect: Aabb2D<T>,
        mut f: F,
    ) -> ControlFlow<()> {
        for (slot, aabb) in self.slots.iter().enumerate() {
            if let Some(aabb) = aabb
                && aabb.overlaps(&rect)
            {
                f(slot)?;
            }
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn visits_in_slot_order_and_stops_early() {
        let mut flat = FlatVec::<f64>::default();
        flat.insert(2, Aabb2D::new(0.0, 0.0, 1.0, 1.0));
        flat.insert(0, Aabb2D::new(0.5, 0.5, 2.0, 2.0));
        flat.insert(1, Aabb2D::new(10.0, 10.0, 11.0, 11.0));

        let mut seen = Vec::new();
        let flow = flat.visit_rect(Aabb2D::new(0.0, 0.0, 1.0, 1.0), |s| {
            seen.push(s);
            ControlFlow::Continue(())
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(seen, vec![0, 2]);

        seen.clear();
        let flow = flat.visit_rect(Aabb2D::new(0.0, 0.0, 1.0, 1.0), |s| {
            seen.push(s);
            ControlFlow::Break(())
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn removed_slots_are_skipped() {
        let mut flat = FlatVec::<i64>::default();
        flat.insert(0, Aabb2D::new(0, 0, 10, 10));
        flat.remove(0);
        flat.remove(7);
        let mut hits = 0;
        let _ = flat.visit_point(5, 5, |_| {
            hits += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(hits, 0);
    }
}

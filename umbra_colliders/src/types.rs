// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the collider world: identifiers, filters, and collider descriptors.

use kurbo::Affine;

use crate::shape::ConvexPolygon;

/// Opaque identifier of the entity that owns a collider.
///
/// Only meaningful within the snapshot that produced it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityId(pub u64);

/// Identifier for a collider slot in a [`ColliderWorld`](crate::ColliderWorld) (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ColliderId(pub(crate) u32, pub(crate) u32);

impl ColliderId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Collision categories a collider belongs to, or that a filter accepts.
    ///
    /// Bits have no built-in meaning; games assign their own. Any bit pattern
    /// is valid, the named groups are only conveniences.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionGroups: u32 {
        /// Group 1.
        const GROUP_1 = 1 << 0;
        /// Group 2.
        const GROUP_2 = 1 << 1;
        /// Group 3.
        const GROUP_3 = 1 << 2;
        /// Group 4.
        const GROUP_4 = 1 << 3;
        /// Group 5.
        const GROUP_5 = 1 << 4;
        /// Group 6.
        const GROUP_6 = 1 << 5;
        /// Group 7.
        const GROUP_7 = 1 << 6;
        /// Group 8.
        const GROUP_8 = 1 << 7;
        /// Every group.
        const ALL = u32::MAX;
    }
}

/// Category/mask pair deciding which colliders a query sees.
///
/// Matching is symmetric: two filters interact only if each one's `mask`
/// accepts one of the other's `groups`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    /// Groups this filter belongs to.
    pub groups: CollisionGroups,
    /// Groups this filter accepts.
    pub mask: CollisionGroups,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            groups: CollisionGroups::GROUP_1,
            mask: CollisionGroups::ALL,
        }
    }
}

impl CollisionFilter {
    /// Filter that belongs to `groups` and accepts `mask`.
    pub const fn new(groups: CollisionGroups, mask: CollisionGroups) -> Self {
        Self { groups, mask }
    }

    /// Filter that interacts with nothing.
    pub const fn none() -> Self {
        Self {
            groups: CollisionGroups::empty(),
            mask: CollisionGroups::empty(),
        }
    }

    /// Whether a query with this filter sees a collider with `other`.
    pub fn interacts_with(&self, other: &Self) -> bool {
        self.mask.intersects(other.groups) && other.mask.intersects(self.groups)
    }
}

/// Collider descriptor: a local-space shape placed in the world.
#[derive(Clone, Debug)]
pub struct Collider {
    /// Entity owning the collider. Queries can ignore one owner.
    pub owner: EntityId,
    /// Shape in local coordinates.
    pub shape: ConvexPolygon,
    /// Local-to-world transform.
    pub transform: Affine,
    /// Collision categories.
    pub filter: CollisionFilter,
}

impl Collider {
    /// Collider for `owner` with an identity transform and the default filter.
    pub fn new(owner: EntityId, shape: ConvexPolygon) -> Self {
        Self {
            owner,
            shape,
            transform: Affine::IDENTITY,
            filter: CollisionFilter::default(),
        }
    }

    /// Set the local-to-world transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Set the collision filter.
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }
}

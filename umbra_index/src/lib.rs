// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Umbra Index: a generic 2D AABB index used as the broad phase of a collider world.
//!
//! - Insert, update, and remove axis-aligned bounding boxes (AABBs) with small `Copy` payloads.
//! - Query by point or by overlapping rectangle, collecting results or visiting them in place.
//! - Visitors return [`ControlFlow`](core::ops::ControlFlow), so a query can stop as soon as
//!   the caller has found what it needs.
//!
//! The index is generic over the scalar type `T` and does not depend on any geometry crate.
//! Higher layers compute world-space AABBs for their shapes and feed them here. Mutations are
//! applied immediately; there is no batching step between an update and the next query.
//!
//! Backends are pluggable via the [`Backend`] trait. The default backend is a flat vector
//! (linear scan). A uniform grid is available behind the `backend_grid` feature.
//!
//! ## Features
//!
//! - `backend_grid` *(default)*: enables the uniform grid backend, which depends on
//!   `hashbrown` and `smallvec`.
//!
//! # Example
//!
//! ```rust
//! use umbra_index::{Aabb2D, Index};
//!
//! let mut idx: Index<f64, u32> = Index::new();
//! let wall = idx.insert(Aabb2D::new(0.0, 0.0, 10.0, 1.0), 1);
//! let _pillar = idx.insert(Aabb2D::new(5.0, 5.0, 6.0, 6.0), 2);
//!
//! idx.update(wall, Aabb2D::new(20.0, 0.0, 30.0, 1.0));
//!
//! let hits: Vec<_> = idx.query_point(5.5, 5.5).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].1, 2);
//! ```
//!
//! ## Choosing a backend
//!
//! - `FlatVec` (default): simplest and smallest. Good for a handful of colliders or as a
//!   reference when testing other backends.
//! - `GridF32`/`GridF64`/`GridI64` *(feature `backend_grid`)*: uniform grid with a configurable
//!   cell size. A good fit when colliders are spread fairly evenly and query rectangles are
//!   small compared to the world.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates. Debug builds may assert.

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod index;
mod types;

pub use backend::Backend;
pub use index::{Index, IndexGeneric, Key};
pub use types::{Aabb2D, Scalar};

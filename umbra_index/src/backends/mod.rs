// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans (small, simple, deterministic order).
//! - `grid` (feature `backend_grid`): uniform grid with configurable cell size.
//!
//! Colliders in a game level are usually spread fairly evenly and visibility
//! queries cover a small square around each observer, which is the case the
//! grid is built for. The flat vector is the default because it has no
//! tuning knob.

pub(crate) mod flatvec;
#[cfg(feature = "backend_grid")]
pub(crate) mod grid;

pub use flatvec::FlatVec;
#[cfg(feature = "backend_grid")]
pub use grid::{Grid, GridF32, GridF64, GridI64, GridScalar};

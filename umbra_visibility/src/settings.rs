// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning constants and the internal/output unit conversion.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

/// Tolerances used by the visibility pass.
///
/// All distances are in internal units except
/// [`epsilon_output_distance`](Self::epsilon_output_distance), which is
/// compared after conversion to output units. The defaults suit worlds
/// measured in meters with obstacles no thinner than a few centimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct VisibilitySettings {
    /// Sideways offset of each of the two rays cast past a vertex.
    pub epsilon_ray_distance_variation: f64,
    /// Two ray hits closer than this landed on the same vertex. Also how
    /// close a ray must land to a boundary vertex to reach it.
    pub epsilon_distance_vertex_hit: f64,
    /// How much shorter than the vertex distance a hit must be to count as
    /// an occluder in front of the vertex.
    pub epsilon_threshold_obstacle_hit: f64,
    /// Candidate vertices closer than this are merged.
    pub epsilon_duplicate_vertex: f64,
    /// Outward extension of the query square's edges, and how far a ray is
    /// pushed past the square when it is clamped.
    pub boundary_nudge: f64,
    /// Consecutive boundary points closer than this (output units) are merged.
    pub epsilon_output_distance: f64,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            epsilon_ray_distance_variation: 1e-4,
            epsilon_distance_vertex_hit: 1e-2,
            epsilon_threshold_obstacle_hit: 1e-2,
            epsilon_duplicate_vertex: 1e-6,
            boundary_nudge: 1e-3,
            epsilon_output_distance: 1e-4,
        }
    }
}

impl VisibilitySettings {
    /// Copy with every tolerance replaced by its magnitude.
    #[must_use]
    pub fn absolutized(self) -> Self {
        Self {
            epsilon_ray_distance_variation: self.epsilon_ray_distance_variation.abs(),
            epsilon_distance_vertex_hit: self.epsilon_distance_vertex_hit.abs(),
            epsilon_threshold_obstacle_hit: self.epsilon_threshold_obstacle_hit.abs(),
            epsilon_duplicate_vertex: self.epsilon_duplicate_vertex.abs(),
            boundary_nudge: self.boundary_nudge.abs(),
            epsilon_output_distance: self.epsilon_output_distance.abs(),
        }
    }
}

/// Linear map from internal units (where geometry is computed) to output units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct UnitScale {
    /// Output units per internal unit, for example pixels per meter.
    pub output_per_internal: f64,
}

impl Default for UnitScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl UnitScale {
    /// Output and internal units are the same.
    pub const IDENTITY: Self = Self {
        output_per_internal: 1.0,
    };

    /// Scale with the given number of output units per internal unit.
    pub const fn new(output_per_internal: f64) -> Self {
        Self {
            output_per_internal,
        }
    }

    /// Convert an internal point to output units.
    #[inline]
    pub fn to_output(self, p: Point) -> Point {
        (p.to_vec2() * self.output_per_internal).to_point()
    }

    /// Convert an output point to internal units.
    #[inline]
    pub fn to_internal(self, p: Point) -> Point {
        (p.to_vec2() / self.output_per_internal).to_point()
    }
}

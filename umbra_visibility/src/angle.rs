// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cheap angular ordering of directions around the eye.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Vec2;

/// Order-preserving substitute for `atan2(diff.y, diff.x)`.
///
/// Maps directions to `(-2, 2]` without trigonometry: the positive x axis is
/// `0`, angles grow counter-clockwise, and the negative x axis is `2`. A
/// vertical component of zero (including `-0.0`) counts as non-negative, so
/// the value is strictly monotonic in the angle over `(-π, π]`. Only useful
/// for sorting; the zero vector maps to `0`.
#[inline]
pub fn comparable_angle(diff: Vec2) -> f64 {
    let manhattan = diff.x.abs() + diff.y.abs();
    if manhattan == 0.0 {
        return 0.0;
    }
    let half_turn = 1.0 - diff.x / manhattan;
    if diff.y < 0.0 { -half_turn } else { half_turn }
}

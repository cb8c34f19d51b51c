// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Properties of the angle proxy and the wrapping index.

use core::f64::consts::PI;

use kurbo::Vec2;
use proptest::prelude::*;
use umbra_visibility::{WrappingIndex, comparable_angle};

fn direction() -> impl Strategy<Value = Vec2> {
    (-PI..=PI, 1e-3..1e3_f64).prop_map(|(a, r)| Vec2::new(a.cos() * r, a.sin() * r))
}

proptest! {
    #[test]
    fn orders_like_atan2(a in direction(), b in direction()) {
        let (ta, tb) = (a.y.atan2(a.x), b.y.atan2(b.x));
        prop_assume!((ta - tb).abs() > 1e-9);
        prop_assert_eq!(
            comparable_angle(a) < comparable_angle(b),
            ta < tb,
            "{:?} at {} vs {:?} at {}", a, ta, b, tb
        );
    }

    #[test]
    fn stays_in_range(v in direction()) {
        let c = comparable_angle(v);
        prop_assert!(c > -2.0 && c <= 2.0);
    }

    #[test]
    fn ignores_magnitude(v in direction(), k in 1e-3..1e3_f64) {
        let c = comparable_angle(v);
        prop_assert!((comparable_angle(v * k) - c).abs() < 1e-12);
    }

    #[test]
    fn wrapping_index_lands_in_range(i in -10_000_isize..10_000, len in 1_usize..500) {
        let w = WrappingIndex(i).wrap(len);
        prop_assert!(w < len);
        prop_assert_eq!((w as isize - i).rem_euclid(len as isize), 0);
    }
}

#[test]
fn dense_sweep_is_strictly_increasing() {
    let steps = 4096;
    let mut last = f64::NEG_INFINITY;
    // (-π, π], starting just past the negative x axis.
    for k in 1..=steps {
        let a = -PI + 2.0 * PI * f64::from(k) / f64::from(steps);
        let c = comparable_angle(Vec2::new(a.cos(), a.sin()));
        assert!(c > last, "step {k}: {c} after {last}");
        last = c;
    }
    assert!((last - 2.0).abs() < 1e-12);
}

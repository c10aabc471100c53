//! Interpolation kernels for table lookup.

/// Linear interpolation between `y0` and `y1` with `t` in [0, 1].
#[inline]
pub fn linear(t: f64, y0: f64, y1: f64) -> f64 {
    y0 + t * (y1 - y0)
}

/// 3rd-order Hermite interpolation between `y0` and `y1`.
///
/// `ym1` and `y2` are the neighboring samples on either side; `t` is the
/// offset in [0, 1] between `y0` and `y1`.
#[inline]
pub fn hermite(t: f64, ym1: f64, y0: f64, y1: f64, y2: f64) -> f64 {
    let c0 = y0;
    let c1 = 0.5 * (y1 - ym1);
    let c2 = ym1 - 2.5 * y0 + 2.0 * y1 - 0.5 * y2;
    let c3 = 1.5 * (y0 - y1) + 0.5 * (y2 - ym1);
    ((c3 * t + c2) * t + c1) * t + c0
}

/// Cubic interpolation between `y0` and `y1`.
///
/// `ym1` and `y2` are the neighboring samples on either side; `t` is the
/// offset in [0, 1] between `y0` and `y1`.
#[inline]
pub fn cubic(t: f64, ym1: f64, y0: f64, y1: f64, y2: f64) -> f64 {
    let c3 = y2 - y1 + y0 - ym1;
    let c2 = ym1 - y0 - c3;
    let c1 = y1 - ym1;
    let c0 = y0;
    ((c3 * t + c2) * t + c1) * t + c0
}

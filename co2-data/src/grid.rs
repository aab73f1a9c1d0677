//! Evaluation grids for density curves.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// `n` evenly spaced points from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Tick index range and increment. A negative increment means "divide by
/// `-inc`", which keeps sub-unit steps exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        i1 = (start * scale).round();
        i2 = (stop * scale).round();
        if i1 / scale < start {
            i1 += 1.0;
        }
        if i2 / scale > stop {
            i2 -= 1.0;
        }
        inc = -scale;
    } else {
        let scale = 10f64.powf(power) * factor;
        i1 = (start / scale).round();
        i2 = (stop / scale).round();
        if i1 * scale < start {
            i1 += 1.0;
        }
        if i2 * scale > stop {
            i2 -= 1.0;
        }
        inc = scale;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Roughly `count` round-numbered ticks covering `[start, stop]`, matching
/// the d3 linear-scale `ticks` algorithm (steps of 1, 2 or 5 × 10ⁿ).
///
/// Ticks never fall outside the domain, so the endpoints are included only
/// when they are themselves round numbers.
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0) as usize;
    let tick = |i: usize| {
        let index = i1 + i as f64;
        if inc < 0.0 {
            index / -inc
        } else {
            index * inc
        }
    };
    if reverse {
        (0..n).map(|i| tick(n - 1 - i)).collect()
    } else {
        (0..n).map(tick).collect()
    }
}

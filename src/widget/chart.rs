pub mod dual_axis;

use data::time::DAY_MS;

/// Compute a "nice" step close to range/target using 1/2/5*10^k
fn nice_step(range: f64, target: usize) -> f64 {
    let target = target.max(2) as f64;
    let raw = (range / target).max(f64::EPSILON);
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let n = raw / base;
    let nice = if n <= 1.0 {
        1.0
    } else if n <= 2.0 {
        2.0
    } else if n <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

/// Value ticks within `[min, max]`.
fn ticks(min: f64, max: f64, target: usize) -> (Vec<f64>, f64) {
    let span = (max - min).abs().max(1e-9);
    let step = nice_step(span, target);
    let start = (min / step).ceil() * step;

    let mut v = Vec::new();
    let mut t = start;
    for _ in 0..100 {
        if t > max + step * 1e-6 {
            break;
        }
        v.push(t);
        t += step;
    }
    (v, step)
}

const TIME_TICK_CANDIDATES: [i64; 9] = [
    DAY_MS,
    2 * DAY_MS,
    7 * DAY_MS,
    14 * DAY_MS, //
    30 * DAY_MS,
    61 * DAY_MS,
    91 * DAY_MS,
    182 * DAY_MS,
    365 * DAY_MS,
];

/// Day-aligned time ticks at least `min_px` apart.
fn time_ticks(min_x: i64, max_x: i64, px_per_ms: f64, min_px: f64) -> (Vec<i64>, i64) {
    let step = TIME_TICK_CANDIDATES
        .iter()
        .copied()
        .find(|candidate| *candidate as f64 * px_per_ms >= min_px)
        .unwrap_or(TIME_TICK_CANDIDATES[TIME_TICK_CANDIDATES.len() - 1]);

    // first step boundary >= min_x, counted from the epoch
    let first = min_x.div_euclid(step) * step;
    let first = if first < min_x { first + step } else { first };

    let mut out = Vec::new();
    let mut t = first;
    for _ in 0..=2000 {
        if t > max_x {
            break;
        }
        out.push(t);
        t = t.saturating_add(step);
    }
    (out, step)
}

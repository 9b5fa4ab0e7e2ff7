//! Numeric building blocks shared by the sample pipeline and sweep metrics.

use serde::Serialize;

/// Weighted moments of a wavelength distribution.
///
/// Skewness and kurtosis are the plain standardized third and fourth moments
/// (no Fisher excess, no small-sample correction). Both are `None` when the
/// standard deviation is zero, i.e. all weight sits in one bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectralMoments {
    pub weighted_mean: f64,
    pub std_dev: f64,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

/// Index of the first maximum.
pub fn peak_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Wavelength step at `index`, taken as the backward difference.
///
/// At index 0 there is no predecessor, so the forward difference is used.
/// `None` for single-point axes.
pub fn local_spacing(wavelengths: &[f64], index: usize) -> Option<f64> {
    if wavelengths.len() < 2 || index >= wavelengths.len() {
        return None;
    }
    if index == 0 {
        log::warn!("peak at first sample, using forward wavelength spacing");
        Some(wavelengths[1] - wavelengths[0])
    } else {
        Some(wavelengths[index] - wavelengths[index - 1])
    }
}

/// Bounds `[lo, hi)` of the peak exclusion window.
///
/// `half_width_nm / spacing` is truncated toward zero, then the window is
/// clamped to the array.
pub fn exclusion_window(
    len: usize,
    index: usize,
    half_width_nm: f64,
    spacing: f64,
) -> (usize, usize) {
    let half = (half_width_nm / spacing).trunc();
    let half = if half.is_finite() && half > 0.0 {
        half as usize
    } else {
        0
    };
    let lo = index.saturating_sub(half);
    let hi = index.saturating_add(half).min(len);
    (lo, hi)
}

/// Mean of the values outside `[lo, hi)`.
///
/// When the window swallows the whole array there are no tails; the minimum
/// intensity stands in as the floor.
pub fn floor_estimate(values: &[f64], lo: usize, hi: usize) -> f64 {
    let tails = values[..lo].iter().chain(values[hi..].iter());
    let count = lo + (values.len() - hi);
    if count == 0 {
        log::warn!("peak window covers the whole trace, using minimum as floor");
        return values.iter().copied().fold(f64::INFINITY, f64::min);
    }
    tails.sum::<f64>() / count as f64
}

/// Subtract `floor` and clamp anything below `clip` to exactly zero.
pub fn subtract_floor(values: &[f64], floor: f64, clip: f64) -> Vec<f64> {
    values
        .iter()
        .map(|&v| {
            let d = v - floor;
            if d < clip {
                0.0
            } else {
                d
            }
        })
        .collect()
}

/// Scale to unit sum. `None` when the sum is zero, negative or not finite.
pub fn normalize(values: &[f64]) -> Option<Vec<f64>> {
    let sum: f64 = values.iter().sum();
    if !(sum > 0.0) || !sum.is_finite() {
        return None;
    }
    Some(values.iter().map(|v| v / sum).collect())
}

/// `Σ (x[i] - center)^n * w[i]`.
pub fn central_moment(x: &[f64], weights: &[f64], center: f64, n: i32) -> f64 {
    x.iter()
        .zip(weights)
        .map(|(&xi, &wi)| (xi - center).powi(n) * wi)
        .sum()
}

/// Weighted mean, standard deviation, skewness and kurtosis of `x`.
///
/// `weights` must already sum to one. The variance goes through `abs` before
/// the square root so rounding noise cannot produce NaN.
pub fn weighted_moments(x: &[f64], weights: &[f64]) -> SpectralMoments {
    let mean: f64 = x.iter().zip(weights).map(|(xi, wi)| xi * wi).sum();
    let std_dev = central_moment(x, weights, mean, 2).abs().sqrt();
    let (skewness, kurtosis) = if std_dev > 0.0 {
        (
            Some(central_moment(x, weights, mean, 3) / std_dev.powi(3)),
            Some(central_moment(x, weights, mean, 4) / std_dev.powi(4)),
        )
    } else {
        (None, None)
    };
    SpectralMoments {
        weighted_mean: mean,
        std_dev,
        skewness,
        kurtosis,
    }
}

// ---------------------------------------------------------------------------
// Linear regression
// ---------------------------------------------------------------------------

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Ordinary least squares over `(x, y)` points.
///
/// `None` with fewer than two points or when every `x` is equal. A perfectly
/// flat `y` gives `r_squared == 1.0`.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_tot: f64 = points.iter().map(|p| (p.1 - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|p| (p.1 - (slope * p.0 + intercept)).powi(2))
        .sum();
    let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

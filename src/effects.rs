//! Scroll-linked presentation transforms.
//!
//! Every function here is a pure mapping from normalized scroll progress
//! (`0.0` at the top of the tracked region, `1.0` at the bottom) to style
//! parameters. Progress outside `[0, 1]` is clamped.

use serde::Serialize;

/// Piecewise-linear interpolation over matching input/output stops.
///
/// Inputs below the first stop map to the first output, inputs above the
/// last stop map to the last output. `input` must be sorted ascending and the
/// same length as `output`; mismatched or empty stops yield `0.0`.
pub fn interpolate(value: f64, input: &[f64], output: &[f64]) -> f64 {
    if input.is_empty() || input.len() != output.len() {
        return 0.0;
    }
    if value <= input[0] {
        return output[0];
    }
    let last = input.len() - 1;
    if value >= input[last] {
        return output[last];
    }

    for i in 0..last {
        let (x0, x1) = (input[i], input[i + 1]);
        if value >= x0 && value <= x1 {
            let span = x1 - x0;
            if span <= f64::EPSILON {
                return output[i + 1];
            }
            let t = (value - x0) / span;
            return output[i] + t * (output[i + 1] - output[i]);
        }
    }
    output[last]
}

fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VanPosition {
    /// Horizontal offset as a percentage of the track width.
    pub x_percent: f64,
    /// Vertical bounce in pixels.
    pub y_px: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardStyle {
    pub opacity: f64,
    pub y_px: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DotStyle {
    pub opacity: f64,
    pub scale: f64,
}

/// Van travelling along the journey timeline road.
pub fn timeline_van(progress: f64) -> VanPosition {
    let p = clamp_progress(progress);
    let bounce_stops: Vec<f64> = (0..=10).map(|i| i as f64 / 10.0).collect();
    let bounce_values: Vec<f64> = (0..=10)
        .map(|i| if i % 2 == 1 { -1.0 } else { 0.0 })
        .collect();

    VanPosition {
        x_percent: interpolate(p, &[0.0, 1.0], &[5.0, 85.0]),
        y_px: interpolate(p, &bounce_stops, &bounce_values),
    }
}

/// Road marker `index` of `count` brightens as the van passes it.
pub fn timeline_marker_opacity(progress: f64, index: usize, count: usize) -> f64 {
    let p = clamp_progress(progress);
    let position = if count > 1 {
        index as f64 / (count - 1) as f64
    } else {
        0.0
    };
    interpolate(
        p,
        &[position - 0.1, position, position + 0.1],
        &[0.3, 1.0, 0.3],
    )
}

/// Timeline card `index` of `count` fades in over its slice of the scroll
/// range and out again at the end of it.
pub fn timeline_card(progress: f64, index: usize, count: usize) -> CardStyle {
    let p = clamp_progress(progress);
    let n = count.max(1) as f64;
    let start = index as f64 / n;
    let end = (index + 1) as f64 / n;
    let stops = [start - 0.05, start + 0.05, end - 0.05, end + 0.05];

    CardStyle {
        opacity: interpolate(p, &stops, &[0.0, 1.0, 1.0, 0.0]),
        y_px: interpolate(p, &stops, &[30.0, 0.0, 0.0, -30.0]),
    }
}

/// Side progress dot for timeline entry `index` of `count`.
pub fn timeline_dot(progress: f64, index: usize, count: usize) -> DotStyle {
    let p = clamp_progress(progress);
    let center = index as f64 / count.max(1) as f64;
    let stops = [center - 0.1, center, center + 0.1];

    DotStyle {
        opacity: interpolate(p, &stops, &[0.2, 1.0, 0.2]),
        scale: interpolate(p, &stops, &[1.0, 1.5, 1.0]),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElevationGauge {
    pub elevation_ft: f64,
    pub bar_scale: f64,
    pub summit_opacity: f64,
}

// Roughly the summit of a Colorado fourteener
const SUMMIT_FT: f64 = 14_000.0;

pub fn elevation_gauge(progress: f64) -> ElevationGauge {
    let p = clamp_progress(progress);
    ElevationGauge {
        elevation_ft: interpolate(p, &[0.0, 1.0], &[0.0, SUMMIT_FT]),
        bar_scale: p,
        summit_opacity: interpolate(p, &[0.8, 1.0], &[0.0, 1.0]),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParallaxLayers {
    pub far_x_px: f64,
    pub mid_x_px: f64,
    pub near_x_px: f64,
    pub contour_y_px: f64,
}

/// Mountain ridges drift at different speeds; the contour overlay rises.
pub fn parallax_layers(progress: f64) -> ParallaxLayers {
    let p = clamp_progress(progress);
    ParallaxLayers {
        far_x_px: interpolate(p, &[0.0, 1.0], &[0.0, 300.0]),
        mid_x_px: interpolate(p, &[0.0, 1.0], &[0.0, 200.0]),
        near_x_px: interpolate(p, &[0.0, 1.0], &[0.0, 100.0]),
        contour_y_px: interpolate(p, &[0.0, 1.0], &[0.0, -100.0]),
    }
}

//! Synthetic route used when the directions service has nothing to offer.
//!
//! The path is a straight interpolation between the endpoints with a small
//! sinusoidal sideways bend, so it reads as a route rather than a ruler line.
//! It is purely cosmetic and fully deterministic.

use std::f64::consts::PI;

use crate::algo::{distance_km, walking_minutes};
use crate::{GeoPoint, RoutePath, RouteSource};

/// Upper bound on the segments of one fallback path
pub const MAX_FALLBACK_SAMPLES: usize = 1024;

/// Builds the fallback path from `start` to `end` with `samples` segments,
/// clamped to `1..=MAX_FALLBACK_SAMPLES`.
///
/// `bend` is the peak sideways offset as a fraction of the endpoint span.
/// The first and last points are exactly `start` and `end`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn fallback_route(start: GeoPoint, end: GeoPoint, samples: usize, bend: f64) -> RoutePath {
    let samples = samples.clamp(1, MAX_FALLBACK_SAMPLES);
    let dlat = end.lat() - start.lat();
    // take the short way round across the antimeridian
    let mut dlng = end.lng() - start.lng();
    if dlng > 180.0 {
        dlng -= 360.0;
    } else if dlng < -180.0 {
        dlng += 360.0;
    }

    let span = dlat.hypot(dlng).max(f64::EPSILON);
    let perp_lat = dlng / span;
    let perp_lng = -dlat / span;
    let amplitude = if bend.is_finite() { bend * span } else { 0.0 };

    let mut points = Vec::with_capacity(samples + 1);
    points.push(start);
    for i in 1..samples {
        let t = i as f64 / samples as f64;
        let offset = (t * PI).sin() * amplitude;
        points.push(GeoPoint::normalized(
            start.lat() + dlat * t + perp_lat * offset,
            start.lng() + dlng * t + perp_lng * offset,
        ));
    }
    points.push(end);

    let straight_km = distance_km(start, end);
    RoutePath::from_parts_unchecked(
        points,
        (straight_km * 1000.0).round() as u32,
        walking_minutes(straight_km),
        RouteSource::Fallback,
    )
}

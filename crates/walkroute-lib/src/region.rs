use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Coordinate;

/// Metres per degree of latitude used by the region estimate.
pub const METRES_PER_DEGREE: f64 = 111_000.0;

/// Tunables for [`compute_center_and_radius`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub metres_per_degree: f64,
    /// Factor applied to longitude spans; roughly `cos(latitude)`.
    pub longitude_scale: f64,
    /// Margin added around the half-span so streets just outside the stops
    /// are still fetched.
    pub buffer_m: f64,
    pub min_radius_m: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            metres_per_degree: METRES_PER_DEGREE,
            // cos(41°), the band the default tuning was made for
            longitude_scale: 0.75,
            buffer_m: 200.0,
            min_radius_m: 500.0,
        }
    }
}

impl RegionConfig {
    /// Default tuning with the longitude scale derived from `lat`.
    pub fn for_latitude(lat: f64) -> Self {
        Self {
            longitude_scale: lat.to_radians().cos().abs(),
            ..Self::default()
        }
    }
}

/// Circular area that covers every requested stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinate,
    pub radius_m: f64,
}

/// Estimate the center and radius of the street network to fetch.
///
/// The center is the midpoint of the latitude and longitude extremes. The
/// radius is half the larger metric span plus `buffer_m`, never less than
/// `min_radius_m`.
pub fn compute_center_and_radius(points: &[Coordinate], config: &RegionConfig) -> Result<Region> {
    let first = points
        .first()
        .ok_or_else(|| Error::invalid_input("at least one point is required to size a region"))?;

    let (mut min_lat, mut max_lat) = (first.lat, first.lat);
    let (mut min_lng, mut max_lng) = (first.lng, first.lng);
    for point in points {
        point.validate()?;
        min_lat = min_lat.min(point.lat);
        max_lat = max_lat.max(point.lat);
        min_lng = min_lng.min(point.lng);
        max_lng = max_lng.max(point.lng);
    }

    let center = Coordinate::new((min_lat + max_lat) / 2.0, (min_lng + max_lng) / 2.0);
    let lat_span_m = (max_lat - min_lat) * config.metres_per_degree;
    let lng_span_m = (max_lng - min_lng) * config.metres_per_degree * config.longitude_scale;
    let radius_m = (lat_span_m.max(lng_span_m) / 2.0 + config.buffer_m).max(config.min_radius_m);

    Ok(Region { center, radius_m })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn latitude_span_drives_radius() {
        let points = [Coordinate::new(41.0, 29.0), Coordinate::new(41.02, 29.0)];
        let region = compute_center_and_radius(&points, &RegionConfig::default()).unwrap();
        assert!(close(region.center.lat, 41.01));
        assert!(close(region.center.lng, 29.0));
        assert!(close(region.radius_m, 1310.0));
    }

    #[test]
    fn single_point_gets_minimum_radius() {
        let points = [Coordinate::new(41.0, 29.0)];
        let region = compute_center_and_radius(&points, &RegionConfig::default()).unwrap();
        assert_eq!(region.center, points[0]);
        assert!(close(region.radius_m, 500.0));
    }

    #[test]
    fn longitude_span_is_scaled() {
        let points = [Coordinate::new(41.0, 29.0), Coordinate::new(41.0, 29.04)];
        let region = compute_center_and_radius(&points, &RegionConfig::default()).unwrap();
        // 0.04 * 111000 * 0.75 = 3330; half plus buffer.
        assert!(close(region.radius_m, 1865.0));
    }

    #[test]
    fn empty_input_is_rejected() {
        let error = compute_center_and_radius(&[], &RegionConfig::default()).unwrap_err();
        assert!(matches!(error, Error::InvalidInput { .. }));
    }

    #[test]
    fn out_of_range_point_is_rejected() {
        let points = [Coordinate::new(41.0, 29.0), Coordinate::new(95.0, 29.0)];
        assert!(compute_center_and_radius(&points, &RegionConfig::default()).is_err());
    }

    #[test]
    fn latitude_derived_scale() {
        assert!(close(RegionConfig::for_latitude(60.0).longitude_scale, 0.5));
        assert!(close(RegionConfig::for_latitude(0.0).longitude_scale, 1.0));
        assert_eq!(RegionConfig::for_latitude(60.0).buffer_m, 200.0);
    }
}

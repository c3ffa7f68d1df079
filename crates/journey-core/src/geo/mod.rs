//! Geodesic geometry on a spherical Earth
//!
//! Pure functions used by the zone store and the interaction controllers:
//! - great-circle distance and bearings
//! - points along a great-circle path
//! - circle rings around a center
//! - radius clamping

mod point;

pub use point::*;

use crate::error::{ZoneError, ZoneResult};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Slack allowed past the end of a path before `point_at_distance_km` fails
const PATH_END_TOLERANCE_KM: f64 = 1e-9;

/// Squared cross-product magnitude below which two unit vectors share no
/// usable great-circle axis
const DEGENERATE_AXIS_SQ: f64 = 1e-24;

/// Great-circle (haversine) distance between two points in kilometers
pub fn geodesic_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    // abs() keeps the result bit-identical when the arguments are swapped
    let d_lat = (b.lat - a.lat).abs().to_radians();
    let d_lon = (b.lon - a.lon).abs().to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from `from` toward `to`, degrees clockwise from north in (-180, 180]
pub fn initial_bearing_deg(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    y.atan2(x).to_degrees()
}

/// Point reached by travelling `distance_km` from `origin` along `bearing_deg`
pub fn destination(origin: GeoPoint, distance_km: f64, bearing_deg: f64) -> GeoPoint {
    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let sin_lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

    GeoPoint::new(normalize_longitude(lon2.to_degrees()), lat2.to_degrees())
}

/// Wrap a longitude into [-180, 180]
pub fn normalize_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Point on the great-circle path from `path_start` toward `path_end`, at
/// `distance_km` from `path_start`
///
/// Fails with `OutOfRangeDistance` when the distance is negative, not finite,
/// or longer than the path.
pub fn point_at_distance_km(
    path_start: GeoPoint,
    path_end: GeoPoint,
    distance_km: f64,
) -> ZoneResult<GeoPoint> {
    let length_km = geodesic_distance_km(path_start, path_end);
    if !distance_km.is_finite()
        || distance_km < 0.0
        || distance_km > length_km + PATH_END_TOLERANCE_KM
    {
        return Err(ZoneError::OutOfRangeDistance {
            requested_km: distance_km,
            length_km,
        });
    }

    if distance_km == 0.0 {
        return Ok(path_start);
    }
    if distance_km >= length_km {
        return Ok(path_end);
    }

    let a = path_start.to_unit_vector();
    let b = path_end.to_unit_vector();
    let axis = a.cross(b);

    if axis.length_squared() < DEGENERATE_AXIS_SQ {
        // Antipodal endpoints: every meridian-like path is a geodesic
        return Ok(destination(
            path_start,
            distance_km,
            initial_bearing_deg(path_start, path_end),
        ));
    }

    let angle = distance_km / EARTH_RADIUS_KM;
    let tangent = axis.normalize().cross(a);
    Ok(GeoPoint::from_unit_vector(
        a * angle.cos() + tangent * angle.sin(),
    ))
}

/// Ring of `segments` vertices approximating the circle of `radius_km` around `center`
///
/// Vertices are ordered by bearing `i * -360 / segments` from north; the ring
/// closes implicitly from the last vertex back to the first. A zero radius
/// degenerates to `segments` copies of `center`.
pub fn circle_polygon(center: GeoPoint, radius_km: f64, segments: usize) -> Vec<GeoPoint> {
    if radius_km <= 0.0 || radius_km.is_nan() {
        return vec![center; segments];
    }

    let step = -360.0 / segments as f64;
    (0..segments)
        .map(|i| destination(center, radius_km, i as f64 * step))
        .collect()
}

/// Clamp a radius into `[0, max_radius_km]`. NaN clamps to zero.
pub fn clamp_radius(radius_km: f64, max_radius_km: f64) -> f64 {
    if radius_km.is_nan() {
        return 0.0;
    }
    radius_km.min(max_radius_km).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn manhattan() -> GeoPoint {
        GeoPoint::new(-74.00811876441851, 40.71602161602726)
    }

    #[test]
    fn test_distance_symmetric() {
        let points = [
            manhattan(),
            GeoPoint::new(-73.98468539999953, 40.75472153232781),
            GeoPoint::new(106.8456, -6.2088),
            GeoPoint::new(179.9, 0.1),
            GeoPoint::new(-179.9, -0.1),
        ];
        for a in points {
            for b in points {
                assert_eq!(geodesic_distance_km(a, b), geodesic_distance_km(b, a));
            }
        }
    }

    #[test]
    fn test_distance_zero_iff_equal() {
        let a = manhattan();
        assert_eq!(geodesic_distance_km(a, a), 0.0);

        let b = GeoPoint::new(a.lon + 1e-6, a.lat);
        assert!(geodesic_distance_km(a, b) > 0.0);
    }

    #[test]
    fn test_distance_known_value() {
        // Jakarta to Bandung is roughly 117 km
        let jakarta = GeoPoint::new(106.8456, -6.2088);
        let bandung = GeoPoint::new(107.6191, -6.9175);
        let d = geodesic_distance_km(jakarta, bandung);
        assert!(d > 110.0 && d < 125.0, "unexpected distance {d}");

        // One degree of latitude
        let d = geodesic_distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert_relative_eq!(d, EARTH_RADIUS_KM.to_radians(), epsilon = 1e-9);
    }

    #[test]
    fn test_destination_matches_distance_and_bearing() {
        let origin = manhattan();
        for bearing in [0.0, 45.0, 90.0, 180.0, -135.0] {
            let p = destination(origin, 3.0, bearing);
            assert_relative_eq!(geodesic_distance_km(origin, p), 3.0, epsilon = 1e-9);
            assert_abs_diff_eq!(initial_bearing_deg(origin, p), bearing, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let p = destination(GeoPoint::new(179.99, 0.0), 5.0, 90.0);
        assert!(p.is_valid());
        assert!(p.lon < 0.0);
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(45.0), 45.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_abs_diff_eq!(normalize_longitude(190.0), -170.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_longitude(-190.0), 170.0, epsilon = 1e-12);
    }

    #[test]
    fn test_point_at_distance_along_path() {
        let start = manhattan();
        let end = destination(start, 5.0, 30.0);

        let mid = point_at_distance_km(start, end, 2.0).unwrap();
        assert_relative_eq!(geodesic_distance_km(start, mid), 2.0, epsilon = 1e-9);
        assert_relative_eq!(geodesic_distance_km(mid, end), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_point_at_distance_endpoints() {
        let start = manhattan();
        let end = destination(start, 5.0, 120.0);
        let length = geodesic_distance_km(start, end);

        assert_eq!(point_at_distance_km(start, end, 0.0).unwrap(), start);
        assert_eq!(point_at_distance_km(start, end, length).unwrap(), end);
        assert_eq!(point_at_distance_km(start, start, 0.0).unwrap(), start);
    }

    #[test]
    fn test_point_at_distance_out_of_range() {
        let start = manhattan();
        let end = destination(start, 5.0, 0.0);

        let err = point_at_distance_km(start, end, 5.5).unwrap_err();
        assert!(matches!(err, ZoneError::OutOfRangeDistance { .. }));
        assert!(point_at_distance_km(start, end, -0.1).is_err());
        assert!(point_at_distance_km(start, end, f64::NAN).is_err());
        assert!(point_at_distance_km(start, start, 0.1).is_err());
    }

    #[test]
    fn test_point_at_distance_antipodal() {
        let start = GeoPoint::new(0.0, 0.0);
        let end = GeoPoint::new(180.0, 0.0);
        let p = point_at_distance_km(start, end, 1000.0).unwrap();
        assert_relative_eq!(geodesic_distance_km(start, p), 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_circle_polygon_radius() {
        let center = manhattan();
        let ring = circle_polygon(center, 1.2, 64);
        assert_eq!(ring.len(), 64);
        for p in &ring {
            assert_abs_diff_eq!(geodesic_distance_km(center, *p), 1.2, epsilon = 1e-9);
        }
        // First vertex is due north
        assert!(ring[0].lat > center.lat);
        assert_abs_diff_eq!(ring[0].lon, center.lon, epsilon = 1e-12);
    }

    #[test]
    fn test_circle_polygon_degenerate() {
        let center = manhattan();
        let ring = circle_polygon(center, 0.0, 16);
        assert_eq!(ring.len(), 16);
        assert!(ring.iter().all(|p| *p == center));
    }

    #[test]
    fn test_clamp_radius() {
        assert_eq!(clamp_radius(1.0, 2.5), 1.0);
        assert_eq!(clamp_radius(10.0, 2.5), 2.5);
        assert_eq!(clamp_radius(-3.0, 2.5), 0.0);
        assert_eq!(clamp_radius(f64::INFINITY, 1.5), 1.5);
        assert_eq!(clamp_radius(f64::NAN, 1.5), 0.0);
        assert_eq!(clamp_radius(clamp_radius(7.0, 1.5), 1.5), 1.5);
    }
}

use std::f64::consts::PI;

use flashpoint_common::GeoPoint;

/// Vertical exaggeration factor, in degrees of latitude per radian of
/// great-circle distance. The lift peaks at the arc midpoint and vanishes
/// at both endpoints, producing a visually arced path rather than a
/// geodesically accurate one.
const LIFT_DEG_PER_RAD: f64 = 8.0;

/// Central angle between two points on the unit sphere, via haversine.
fn central_angle(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * h.sqrt().asin()
}

/// Compute a great-circle path from `origin` to `destination` with
/// `num_points + 1` points, spherically interpolated and lifted by a
/// synthetic height term. Pure and deterministic.
///
/// Degenerate input (origin equals destination) yields the origin point
/// repeated for every fraction — no division by zero, no NaN.
pub fn arc(origin: GeoPoint, destination: GeoPoint, num_points: usize) -> Vec<GeoPoint> {
    let d = central_angle(origin, destination);
    if d < 1e-9 {
        return vec![origin; num_points + 1];
    }

    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let lat2 = destination.lat.to_radians();
    let lon2 = destination.lon.to_radians();
    let sin_d = d.sin();
    let steps = num_points.max(1);

    let mut path = Vec::with_capacity(num_points + 1);
    for i in 0..=num_points {
        let f = i as f64 / steps as f64;
        let a = (((1.0 - f) * d).sin()) / sin_d;
        let b = ((f * d).sin()) / sin_d;

        let x = a * lat1.cos() * lon1.cos() + b * lat2.cos() * lon2.cos();
        let y = a * lat1.cos() * lon1.sin() + b * lat2.cos() * lon2.sin();
        let z = a * lat1.sin() + b * lat2.sin();

        let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
        let lon = y.atan2(x).to_degrees();
        let lift = (f * PI).sin() * d * LIFT_DEG_PER_RAD;

        path.push(GeoPoint {
            lat: lat + lift,
            lon,
        });
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEHRAN: GeoPoint = GeoPoint {
        lat: 35.6892,
        lon: 51.3890,
    };
    const TEL_AVIV: GeoPoint = GeoPoint {
        lat: 32.0853,
        lon: 34.7818,
    };

    #[test]
    fn degenerate_arc_repeats_origin_without_nan() {
        let path = arc(TEHRAN, TEHRAN, 10);
        assert_eq!(path.len(), 11);
        for p in &path {
            assert!(!p.lat.is_nan() && !p.lon.is_nan());
            assert_eq!(*p, TEHRAN);
        }
    }

    #[test]
    fn arc_has_num_points_plus_one_entries() {
        for n in [1, 2, 16, 64] {
            assert_eq!(arc(TEHRAN, TEL_AVIV, n).len(), n + 1);
        }
    }

    #[test]
    fn endpoints_match_origin_and_destination() {
        let path = arc(TEHRAN, TEL_AVIV, 64);
        let first = path.first().unwrap();
        let last = path.last().unwrap();
        assert!((first.lat - TEHRAN.lat).abs() < 1e-6);
        assert!((first.lon - TEHRAN.lon).abs() < 1e-6);
        // The lift term is sin(f*pi), zero at both endpoints
        assert!((last.lat - TEL_AVIV.lat).abs() < 1e-6);
        assert!((last.lon - TEL_AVIV.lon).abs() < 1e-6);
    }

    #[test]
    fn midpoint_is_lifted_above_the_geodesic() {
        let path = arc(TEHRAN, TEL_AVIV, 64);
        let mid = path[32];
        let flat_mid_lat = (TEHRAN.lat + TEL_AVIV.lat) / 2.0;
        assert!(mid.lat > flat_mid_lat);
    }

    #[test]
    fn antimeridian_crossing_stays_in_range() {
        let a = GeoPoint::new(10.0, 179.0);
        let b = GeoPoint::new(12.0, -179.0);
        for p in arc(a, b, 32) {
            assert!(p.lon >= -180.0 && p.lon <= 180.0);
            assert!(!p.lat.is_nan());
        }
    }
}

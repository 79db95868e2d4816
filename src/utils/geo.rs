use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in plain degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Squared planar distance between two points in degree space.
/// Not a geodesic: only valid for ranking points inside a single city's
/// bounding box, which is all the fleet map works with.
pub fn planar_distance_sq(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = b.lat - a.lat;
    let dlng = b.lng - a.lng;
    dlat * dlat + dlng * dlng
}

/// Planar distance in degrees.
pub fn planar_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    planar_distance_sq(a, b).sqrt()
}

/// Index of the polyline point nearest to `from`.
/// Linear scan with strict `<`, so ties keep the first occurrence.
/// Returns `None` for an empty line.
pub fn nearest_point_index(line: &[GeoPoint], from: GeoPoint) -> Option<usize> {
    let mut nearest = None;
    let mut min_sq = f64::INFINITY;
    for (i, p) in line.iter().enumerate() {
        let d = planar_distance_sq(from, *p);
        if d < min_sq {
            min_sq = d;
            nearest = Some(i);
        }
    }
    nearest
}

/// Bearing of the segment from `a` to `b` in degrees, atan2 convention:
/// 0° points along +lng (east), 90° along +lat (north).
pub fn heading_degrees(a: GeoPoint, b: GeoPoint) -> f64 {
    let dy = b.lat - a.lat;
    let dx = b.lng - a.lng;
    dy.atan2(dx).to_degrees()
}

/// Normalize an angle in degrees to the (-180, 180] range.
pub fn normalize_degrees(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(9.0306, 38.7636),
            GeoPoint::new(9.0225, 38.7700),
            GeoPoint::new(9.0150, 38.7750),
            GeoPoint::new(9.0050, 38.7850),
        ]
    }

    #[test]
    fn test_nearest_point_minimizes_distance() {
        let line = sample_line();
        let bus = GeoPoint::new(9.0200, 38.7710);

        let idx = nearest_point_index(&line, bus).unwrap();
        let best = planar_distance_sq(bus, line[idx]);
        for p in &line {
            assert!(best <= planar_distance_sq(bus, *p));
        }
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_nearest_point_tie_breaks_to_first() {
        // Two points equidistant from the probe along opposite axes.
        let line = vec![
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(5.0, 5.0),
        ];
        assert_eq!(nearest_point_index(&line, GeoPoint::new(0.0, 0.0)), Some(0));
    }

    #[test]
    fn test_nearest_point_empty_line() {
        assert_eq!(nearest_point_index(&[], GeoPoint::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_heading_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert_eq!(heading_degrees(origin, GeoPoint::new(0.0, 1.0)), 0.0);
        assert_eq!(heading_degrees(origin, GeoPoint::new(1.0, 0.0)), 90.0);
        assert_eq!(heading_degrees(origin, GeoPoint::new(0.0, -1.0)), 180.0);
        assert_eq!(heading_degrees(origin, GeoPoint::new(-1.0, 0.0)), -90.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(270.0), -90.0);
        assert_eq!(normalize_degrees(-190.0), 170.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(45.0), 45.0);
    }
}

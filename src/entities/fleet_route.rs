use serde::Serialize;

use crate::utils::geo::GeoPoint;

/// A dashboard route: a named city line with its map color, stop names and
/// the polyline buses travel along.
#[derive(Debug, Clone, Serialize)]
pub struct FleetRoute {
    pub id: String,
    pub name: String,
    pub color: String,
    pub stops: Vec<String>,
    pub path: Vec<GeoPoint>,
}

fn route(id: &str, name: &str, color: &str, stops: &[&str], path: &[(f64, f64)]) -> FleetRoute {
    FleetRoute {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        stops: stops.iter().map(|s| s.to_string()).collect(),
        path: path.iter().map(|&(lat, lng)| GeoPoint::new(lat, lng)).collect(),
    }
}

/// The eight Addis Ababa lines the dashboard ships with.
pub fn fleet_routes() -> Vec<FleetRoute> {
    vec![
        route(
            "5",
            "Route 5 (Arat Kilo - Mexico)",
            "#e63946",
            &["Arat Kilo", "Sidist Kilo", "Addisu Gebeya", "Mexico"],
            &[
                (9.0306, 38.7636),
                (9.0225, 38.7700),
                (9.0150, 38.7750),
                (9.0050, 38.7850),
            ],
        ),
        route(
            "8",
            "Route 8 (Mercato - Saris)",
            "#457b9d",
            &["Mercato", "Legehar", "Bole Bridge", "Saris"],
            &[(9.0250, 38.7450), (9.0350, 38.7500), (9.0450, 38.7600)],
        ),
        route(
            "12",
            "Route 12 (University - Piazza)",
            "#2a9d8f",
            &["AAU", "Sidist Kilo", "Arat Kilo", "Piazza"],
            &[(9.0400, 38.7600), (9.0350, 38.7550), (9.0300, 38.7500)],
        ),
        route(
            "2",
            "Route 2 (Ayat - Megenagna)",
            "#7209b7",
            &["Ayat", "Bole Homes", "Megenagna", "Urael"],
            &[(9.0100, 38.7800), (9.0200, 38.7700), (9.0300, 38.7600)],
        ),
        route(
            "15",
            "Route 15 (Bole - CMC)",
            "#f8961e",
            &["Bole Medhanialem", "CMC", "Kazanchis", "Megenagna"],
            &[(9.0400, 38.7700), (9.0450, 38.7650), (9.0500, 38.7600)],
        ),
        route(
            "22",
            "Route 22 (Kality - Gofa)",
            "#4cc9f0",
            &["Kality", "Lemi Kura", "Gofa", "Megenagna"],
            &[(9.0100, 38.7500), (9.0200, 38.7400), (9.0300, 38.7300)],
        ),
        route(
            "31",
            "Route 31 (Kotebe - Legehar)",
            "#ef476f",
            &["Kotebe", "Megenagna", "Legehar", "Piazza"],
            &[(9.0200, 38.7600), (9.0250, 38.7550), (9.0300, 38.7500)],
        ),
        route(
            "42",
            "Route 42 (Saris - Summit)",
            "#06d6a0",
            &["Saris", "Summit", "CMC", "Bole"],
            &[(9.0150, 38.7700), (9.0200, 38.7650), (9.0250, 38.7600)],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_has_a_drivable_polyline() {
        let routes = fleet_routes();
        assert_eq!(routes.len(), 8);
        for r in &routes {
            assert!(r.path.len() >= 2, "route {} has a degenerate path", r.id);
            assert!(r.color.starts_with('#'));
            assert!(!r.stops.is_empty());
        }
    }

    #[test]
    fn route_ids_are_unique() {
        let routes = fleet_routes();
        for (i, a) in routes.iter().enumerate() {
            for b in &routes[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}

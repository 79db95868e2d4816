use serde::{Deserialize, Serialize};

/// Price per seat used when a booking references a route the catalog does
/// not know.
pub const FALLBACK_SEAT_PRICE: f64 = 10.0;

/// A bookable catalog route. Field names are the wire shape the booking
/// page consumes, so this struct serializes directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub duration: String,
    /// Service class, "Luxury" or "Standard" in the sample data but
    /// upstream catalogs may send anything.
    #[serde(rename = "type")]
    pub service: String,
    pub ac: bool,
    pub departure: String,
    pub arrival: String,
}

/// The hard-coded popular routes served whenever no upstream catalog is
/// reachable (or configured).
pub fn sample_routes() -> Vec<Route> {
    fn route(
        id: &str,
        title: &str,
        price: f64,
        duration: &str,
        service: &str,
        departure: &str,
        arrival: &str,
    ) -> Route {
        Route {
            id: id.to_string(),
            title: title.to_string(),
            price,
            duration: duration.to_string(),
            service: service.to_string(),
            ac: true,
            departure: departure.to_string(),
            arrival: arrival.to_string(),
        }
    }

    vec![
        route("r1", "Mercato ↔ Saris", 20.0, "1h 10m", "Luxury", "08:00 AM", "09:10 AM"),
        route("r2", "Ayat ↔ Megenagna", 10.0, "1h 10m", "Standard", "07:30 AM", "08:40 AM"),
        route("r3", "Bole ↔ CMC", 8.0, "0h 50m", "Standard", "06:45 AM", "07:35 AM"),
        route("r4", "Arat Kilo ↔ Mexico", 25.0, "01h 05m", "Luxury", "07:00 AM", "08:05 AM"),
    ]
}

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One passenger row as the booking form submits it. `seat` is absent when
/// the caller lets the server pair passengers with seats in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat: Option<String>,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// "SR-" + six digits, or whatever id the upstream assigned.
    pub id: String,
    pub route_id: String,
    pub route_title: String,
    pub seats: Vec<String>,
    pub passengers: Vec<Passenger>,
    /// Travel date as submitted by the client.
    pub date: DateTime<Utc>,
    pub price_per_seat: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Locally assigned booking reference, `SR-` plus six digits.
pub fn generate_booking_id<R: Rng>(rng: &mut R) -> String {
    format!("SR-{}", rng.gen_range(100_000..1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn booking_ids_are_sr_plus_six_digits() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let id = generate_booking_id(&mut rng);
            let digits = id.strip_prefix("SR-").unwrap();
            assert_eq!(digits.len(), 6);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }
}

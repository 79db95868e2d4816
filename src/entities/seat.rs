use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const SEAT_ROWS: u32 = 10;
pub const SEAT_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];
/// Chance that a freshly generated seat is already taken.
pub const PREBOOKED_PROBABILITY: f64 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Booked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    pub status: SeatStatus,
}

/// Generate the full 10x4 seat grid in row-major order (1A, 1B, ... 10D),
/// each seat randomly pre-booked.
pub fn generate_seats<R: Rng>(rng: &mut R) -> Vec<Seat> {
    let mut seats = Vec::with_capacity(SEAT_ROWS as usize * SEAT_LETTERS.len());
    for row in 1..=SEAT_ROWS {
        for letter in SEAT_LETTERS {
            let status = if rng.gen_bool(PREBOOKED_PROBABILITY) {
                SeatStatus::Booked
            } else {
                SeatStatus::Available
            };
            seats.push(Seat {
                id: format!("{row}{letter}"),
                status,
            });
        }
    }
    seats
}

/// One open seat-selection dialog: a fresh seat map plus the seats picked
/// so far. Confirming a booking consumes the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSession {
    pub id: Uuid,
    pub route_id: String,
    pub route_title: String,
    /// Departure time string shown with the confirmation, "N/A" for
    /// unknown routes.
    pub departure: String,
    pub price_per_seat: f64,
    pub seats: Vec<Seat>,
    pub selected: Vec<String>,
    /// Set once the session has been confirmed into a booking; the session
    /// then only serves reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SeatSession {
    pub fn new(
        route_id: String,
        route_title: String,
        departure: String,
        price_per_seat: f64,
        seats: Vec<Seat>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_id,
            route_title,
            departure,
            price_per_seat,
            seats,
            selected: Vec::new(),
            booking_id: None,
            created_at: Utc::now(),
        }
    }

    /// Flip a seat's membership in the selection. Booked seats and unknown
    /// ids are rejected; toggling twice restores the previous selection.
    pub fn toggle(&mut self, seat_id: &str) -> AppResult<()> {
        if self.booking_id.is_some() {
            return Err(AppError::Conflict(
                "Seat session is already confirmed".to_string(),
            ));
        }
        let seat = self
            .seats
            .iter()
            .find(|s| s.id == seat_id)
            .ok_or_else(|| AppError::NotFound(format!("Seat {seat_id} does not exist")))?;
        if seat.status == SeatStatus::Booked {
            return Err(AppError::Conflict(format!("Seat {seat_id} is already booked")));
        }
        match self.selected.iter().position(|s| s == seat_id) {
            Some(idx) => {
                self.selected.remove(idx);
            }
            None => self.selected.push(seat_id.to_string()),
        }
        Ok(())
    }

    /// Mark every selected seat booked in the session's seat map.
    pub fn book_selected(&mut self) {
        for seat in &mut self.seats {
            if self.selected.iter().any(|s| s == &seat.id) {
                seat.status = SeatStatus::Booked;
            }
        }
    }

    pub fn total(&self) -> f64 {
        self.selected.len() as f64 * self.price_per_seat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session_with_seed(seed: u64) -> SeatSession {
        let mut rng = StdRng::seed_from_u64(seed);
        SeatSession::new(
            "r1".to_string(),
            "Mercato ↔ Saris".to_string(),
            "08:00 AM".to_string(),
            20.0,
            generate_seats(&mut rng),
        )
    }

    #[test]
    fn grid_is_forty_unique_seats_in_row_major_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let seats = generate_seats(&mut rng);
        assert_eq!(seats.len(), 40);
        assert_eq!(seats[0].id, "1A");
        assert_eq!(seats[3].id, "1D");
        assert_eq!(seats[4].id, "2A");
        assert_eq!(seats[39].id, "10D");
        for (i, a) in seats.iter().enumerate() {
            for b in &seats[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn double_toggle_restores_selection() {
        let mut session = session_with_seed(2);
        let free = session
            .seats
            .iter()
            .find(|s| s.status == SeatStatus::Available)
            .map(|s| s.id.clone())
            .unwrap();
        session.toggle(&free).unwrap();
        assert_eq!(session.selected, vec![free.clone()]);
        session.toggle(&free).unwrap();
        assert!(session.selected.is_empty());
    }

    #[test]
    fn booked_and_unknown_seats_are_rejected() {
        let mut session = session_with_seed(3);
        session.seats[0].status = SeatStatus::Booked;
        let booked_id = session.seats[0].id.clone();
        assert!(session.toggle(&booked_id).is_err());
        assert!(session.toggle("99Z").is_err());
        assert!(session.selected.is_empty());
    }

    #[test]
    fn confirming_books_exactly_the_selected_seats() {
        let mut session = session_with_seed(4);
        for seat in &mut session.seats {
            seat.status = SeatStatus::Available;
        }
        session.toggle("1A").unwrap();
        session.toggle("2B").unwrap();
        session.book_selected();
        let booked: Vec<&str> = session
            .seats
            .iter()
            .filter(|s| s.status == SeatStatus::Booked)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(booked, vec!["1A", "2B"]);
        assert_eq!(session.total(), 40.0);
    }

    #[test]
    fn confirmed_session_rejects_further_toggles() {
        let mut session = session_with_seed(5);
        for seat in &mut session.seats {
            seat.status = SeatStatus::Available;
        }
        session.toggle("1A").unwrap();
        session.booking_id = Some("SR-123456".to_string());
        assert!(session.toggle("1B").is_err());
    }
}

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{generate_booking_id, Booking, Passenger};
use crate::entities::route::FALLBACK_SEAT_PRICE;
use crate::entities::seat::{generate_seats, SeatSession};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::verify_token;
use crate::utils::validate::{valid_passenger_name, valid_phone};
use crate::AppState;

/// The booking payload the page has always sent to `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub route_id: String,
    pub seats: Vec<String>,
    pub passengers: Vec<Passenger>,
    pub date: Option<DateTime<Utc>>,
    pub price_per_seat: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmSessionRequest {
    pub passengers: Vec<Passenger>,
    pub date: Option<DateTime<Utc>>,
}

/// The read-only confirmation view, formatted the way the page displays it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub route: String,
    pub date: String,
    pub time: String,
    pub seats: Vec<String>,
    pub seats_display: String,
    pub total: f64,
    pub total_display: String,
}

fn confirmation(booking: &Booking, departure: &str) -> BookingConfirmation {
    BookingConfirmation {
        booking_id: booking.id.clone(),
        route: booking.route_title.clone(),
        date: booking.date.format("%a, %b %-d, %Y").to_string(),
        time: departure.to_string(),
        seats: booking.seats.clone(),
        seats_display: booking.seats.join(", "),
        total: booking.total,
        total_display: format!("${:.2}", booking.total),
    }
}

/// Resolve the optional bearer token: absent means an anonymous booking, a
/// present token must verify.
fn optional_user(
    state: &AppState,
    auth: Option<&TypedHeader<Authorization<Bearer>>>,
) -> AppResult<Option<Uuid>> {
    match auth {
        Some(TypedHeader(header)) => {
            let claims = verify_token(header.token(), &state.config.jwt_secret)?;
            Ok(Some(claims.sub))
        }
        None => Ok(None),
    }
}

fn validate_passengers(passengers: &[Passenger], seats: usize) -> AppResult<()> {
    if passengers.len() != seats {
        return Err(AppError::BadRequest(format!(
            "Expected {seats} passenger(s), one per selected seat"
        )));
    }
    for (i, passenger) in passengers.iter().enumerate() {
        if !valid_passenger_name(&passenger.name) {
            return Err(AppError::BadRequest(format!(
                "Invalid name for passenger {}",
                i + 1
            )));
        }
        if !valid_phone(&passenger.phone) {
            return Err(AppError::BadRequest(format!(
                "Invalid phone for passenger {} (10-15 digits)",
                i + 1
            )));
        }
    }
    Ok(())
}

/// Forward the booking upstream when configured; any failure falls back to
/// a locally generated reference.
async fn resolve_booking_id(state: &AppState, payload: &CreateBookingRequest) -> String {
    let upstream_id = match &state.upstream {
        Some(client) => client.create_booking(payload).await,
        None => None,
    };
    upstream_id.unwrap_or_else(|| generate_booking_id(&mut rand::thread_rng()))
}

/// Open a seat-selection session for a route. Every open generates a fresh
/// randomly pre-booked seat map; unknown routes open against a placeholder
/// at the fallback seat price.
pub async fn open_seat_session(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
) -> AppResult<Json<SeatSession>> {
    let route = state.store.find_route(&route_id).await;
    let (title, departure, price) = match &route {
        Some(r) => (r.title.clone(), r.departure.clone(), r.price),
        None => (
            "Unknown Route".to_string(),
            "N/A".to_string(),
            FALLBACK_SEAT_PRICE,
        ),
    };

    let seats = generate_seats(&mut rand::thread_rng());
    let session = state
        .store
        .insert_session(SeatSession::new(route_id, title, departure, price, seats))
        .await;

    Ok(Json(session))
}

/// Read a seat session back
pub async fn get_seat_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SeatSession>> {
    Ok(Json(state.store.session(session_id).await?))
}

/// Toggle one seat's membership in the session's selection
pub async fn toggle_seat(
    State(state): State<AppState>,
    Path((session_id, seat_id)): Path<(Uuid, String)>,
) -> AppResult<Json<SeatSession>> {
    let session = state
        .store
        .with_session(session_id, |session| {
            session.toggle(&seat_id)?;
            Ok(session.clone())
        })
        .await?;
    Ok(Json(session))
}

/// Confirm a seat session into a booking
pub async fn confirm_session(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<ConfirmSessionRequest>,
) -> AppResult<Json<BookingConfirmation>> {
    let user_id = optional_user(&state, auth.as_ref())?;
    let session = state.store.session(session_id).await?;

    if session.booking_id.is_some() {
        return Err(AppError::Conflict(
            "Seat session is already confirmed".to_string(),
        ));
    }
    if session.selected.is_empty() {
        return Err(AppError::BadRequest(
            "Must select at least one seat".to_string(),
        ));
    }
    validate_passengers(&payload.passengers, session.selected.len())?;

    // Pair passengers with seats in selection order
    let passengers: Vec<Passenger> = payload
        .passengers
        .into_iter()
        .zip(&session.selected)
        .map(|(p, seat)| Passenger {
            seat: Some(seat.clone()),
            name: p.name.trim().to_string(),
            phone: p.phone.trim().to_string(),
        })
        .collect();
    let date = payload.date.unwrap_or_else(Utc::now);

    if !state.config.simulated_latency.is_zero() {
        tokio::time::sleep(state.config.simulated_latency).await;
    }

    let forward = CreateBookingRequest {
        route_id: session.route_id.clone(),
        seats: session.selected.clone(),
        passengers: passengers.clone(),
        date: Some(date),
        price_per_seat: Some(session.price_per_seat),
    };
    let booking_id = resolve_booking_id(&state, &forward).await;

    // One confirm per session: re-check and consume under the write lock
    let session = state
        .store
        .with_session(session_id, |s| {
            if s.booking_id.is_some() {
                return Err(AppError::Conflict(
                    "Seat session is already confirmed".to_string(),
                ));
            }
            s.book_selected();
            s.booking_id = Some(booking_id.clone());
            Ok(s.clone())
        })
        .await?;

    let booking = Booking {
        id: booking_id,
        route_id: session.route_id.clone(),
        route_title: session.route_title.clone(),
        seats: session.selected.clone(),
        passengers,
        date,
        price_per_seat: session.price_per_seat,
        total: session.total(),
        user_id,
        created_at: Utc::now(),
    };
    state.store.insert_booking(booking.clone()).await;

    Ok(Json(confirmation(&booking, &session.departure)))
}

/// Create a booking directly from the page's wire payload
pub async fn create_booking(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<BookingConfirmation>> {
    let user_id = optional_user(&state, auth.as_ref())?;

    if payload.seats.is_empty() {
        return Err(AppError::BadRequest("Must book at least 1 seat".to_string()));
    }
    validate_passengers(&payload.passengers, payload.seats.len())?;

    let route = state.store.find_route(&payload.route_id).await;
    let (title, departure) = match &route {
        Some(r) => (r.title.clone(), r.departure.clone()),
        None => ("Unknown Route".to_string(), "N/A".to_string()),
    };
    let price = payload
        .price_per_seat
        .or(route.as_ref().map(|r| r.price))
        .unwrap_or(FALLBACK_SEAT_PRICE);
    let date = payload.date.unwrap_or_else(Utc::now);

    let passengers: Vec<Passenger> = payload
        .passengers
        .iter()
        .zip(&payload.seats)
        .map(|(p, seat)| Passenger {
            seat: p.seat.clone().or_else(|| Some(seat.clone())),
            name: p.name.trim().to_string(),
            phone: p.phone.trim().to_string(),
        })
        .collect();

    if !state.config.simulated_latency.is_zero() {
        tokio::time::sleep(state.config.simulated_latency).await;
    }

    let forward = CreateBookingRequest {
        route_id: payload.route_id.clone(),
        seats: payload.seats.clone(),
        passengers: passengers.clone(),
        date: Some(date),
        price_per_seat: Some(price),
    };
    let booking_id = resolve_booking_id(&state, &forward).await;

    let booking = Booking {
        id: booking_id,
        route_id: payload.route_id,
        route_title: title,
        seats: payload.seats,
        passengers,
        date,
        price_per_seat: price,
        total: forward.seats.len() as f64 * price,
        user_id,
        created_at: Utc::now(),
    };
    state.store.insert_booking(booking.clone()).await;

    Ok(Json(confirmation(&booking, &departure)))
}

/// Fetch a booking by its reference
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    Ok(Json(state.store.booking(&id).await?))
}

/// List the caller's bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> AppResult<Json<Vec<Booking>>> {
    let user_id = optional_user(&state, auth.as_ref())?
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
    Ok(Json(state.store.bookings_for_user(user_id).await))
}

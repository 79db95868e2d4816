use std::collections::VecDeque;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::booking::Booking;
use crate::entities::route::Route;
use crate::entities::seat::SeatSession;
use crate::entities::user::User;
use crate::error::{AppError, AppResult};

/// Open seat sessions kept at most; the oldest is evicted when a new one
/// would exceed this.
pub const MAX_OPEN_SESSIONS: usize = 64;

/// All service state lives here, in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct Store {
    users: RwLock<Vec<User>>,
    catalog: RwLock<Vec<Route>>,
    bookings: RwLock<Vec<Booking>>,
    sessions: RwLock<VecDeque<SeatSession>>,
}

impl Store {
    pub fn new(catalog: Vec<Route>) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            ..Default::default()
        }
    }

    pub async fn insert_user(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub async fn find_user(&self, id: Uuid) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    pub async fn catalog(&self) -> Vec<Route> {
        self.catalog.read().await.clone()
    }

    pub async fn find_route(&self, id: &str) -> Option<Route> {
        self.catalog
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub async fn replace_catalog(&self, routes: Vec<Route>) {
        *self.catalog.write().await = routes;
    }

    /// Register a freshly opened seat session, evicting the oldest one when
    /// the table is full.
    pub async fn insert_session(&self, session: SeatSession) -> SeatSession {
        let mut sessions = self.sessions.write().await;
        sessions.push_back(session.clone());
        while sessions.len() > MAX_OPEN_SESSIONS {
            sessions.pop_front();
        }
        session
    }

    pub async fn session(&self, id: Uuid) -> AppResult<SeatSession> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Seat session not found".to_string()))
    }

    /// Run a mutation against one session under the write lock.
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SeatSession) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound("Seat session not found".to_string()))?;
        f(session)
    }

    pub async fn insert_booking(&self, booking: Booking) {
        self.bookings.write().await.push(booking);
    }

    pub async fn booking(&self, id: &str) -> AppResult<Booking> {
        self.bookings
            .read()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    pub async fn bookings_for_user(&self, user_id: Uuid) -> Vec<Booking> {
        self.bookings
            .read()
            .await
            .iter()
            .filter(|b| b.user_id == Some(user_id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::route::sample_routes;
    use crate::entities::seat::generate_seats;
    use crate::entities::user::UserRole;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_session(tag: &str) -> SeatSession {
        let mut rng = StdRng::seed_from_u64(1);
        SeatSession::new(
            "r1".to_string(),
            tag.to_string(),
            "08:00 AM".to_string(),
            20.0,
            generate_seats(&mut rng),
        )
    }

    #[tokio::test]
    async fn duplicate_emails_conflict_case_insensitively() {
        let store = Store::new(sample_routes());
        let user = User::new(
            "rider@example.com".to_string(),
            "hash".to_string(),
            "Rider".to_string(),
            UserRole::Traveller,
        );
        store.insert_user(user).await.unwrap();
        let dup = User::new(
            "RIDER@example.com".to_string(),
            "hash".to_string(),
            "Other".to_string(),
            UserRole::Traveller,
        );
        assert!(store.insert_user(dup).await.is_err());
        assert!(store.find_user_by_email("Rider@Example.Com").await.is_some());
    }

    #[tokio::test]
    async fn session_table_evicts_oldest_at_capacity() {
        let store = Store::new(Vec::new());
        let first = store.insert_session(new_session("first")).await;
        for i in 0..MAX_OPEN_SESSIONS {
            store.insert_session(new_session(&format!("s{i}"))).await;
        }
        assert!(store.session(first.id).await.is_err());
        let last = store.insert_session(new_session("last")).await;
        assert!(store.session(last.id).await.is_ok());
    }

    #[tokio::test]
    async fn with_session_applies_toggles_in_place() {
        let store = Store::new(Vec::new());
        let mut session = new_session("toggling");
        for seat in &mut session.seats {
            seat.status = crate::entities::seat::SeatStatus::Available;
        }
        let id = store.insert_session(session).await.id;
        store.with_session(id, |s| s.toggle("1A")).await.unwrap();
        store.with_session(id, |s| s.toggle("1A")).await.unwrap();
        let session = store.session(id).await.unwrap();
        assert!(session.selected.is_empty());
    }

    #[tokio::test]
    async fn catalog_lookup_and_replace() {
        let store = Store::new(sample_routes());
        assert!(store.find_route("r1").await.is_some());
        assert!(store.find_route("nope").await.is_none());
        store.replace_catalog(Vec::new()).await;
        assert!(store.catalog().await.is_empty());
    }
}

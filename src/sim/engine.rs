use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::RwLock;

use crate::entities::activity::{ActivityEntry, ActivityLog};
use crate::entities::bus::{Bus, BusStatus, TravelDirection};
use crate::entities::fleet_route::{fleet_routes, FleetRoute};
use crate::error::{AppError, AppResult};
use crate::utils::geo::{
    heading_degrees, nearest_point_index, normalize_degrees, planar_distance, GeoPoint,
};

use super::{FleetFeed, FleetStats, SimParams};

/// Map-visual scale: one km of road travel moves a bus 0.01 degrees.
const DEG_PER_KM: f64 = 0.01;

struct FleetState {
    buses: Vec<Bus>,
    activity: ActivityLog,
    last_update: DateTime<Utc>,
    rng: StdRng,
}

/// The bundled fleet: randomly generated buses driven along the hard-coded
/// city routes by a periodic tick. The tick task is the only writer.
pub struct SimulatedFleet {
    routes: Vec<FleetRoute>,
    params: SimParams,
    state: RwLock<FleetState>,
}

impl SimulatedFleet {
    pub fn new(params: SimParams, fleet_size: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let routes = fleet_routes();
        let route_ids: Vec<String> = routes.iter().map(|r| r.id.clone()).collect();
        let buses = (1..=fleet_size as u32)
            .map(|id| Bus::generate(&mut rng, id, &route_ids))
            .collect();

        Self {
            routes,
            params,
            state: RwLock::new(FleetState {
                buses,
                activity: ActivityLog::default(),
                last_update: Utc::now(),
                rng,
            }),
        }
    }

    /// Advance every bus by one tick: move along the route, maybe flip
    /// status, jitter passenger counts. Offline and maintenance buses are
    /// left untouched.
    pub async fn tick(&self) {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        state.last_update = Utc::now();
        let dt_hours = self.params.tick.as_secs_f64() / 3600.0;

        for bus in &mut state.buses {
            if !bus.status.is_active() {
                continue;
            }

            if let Some(route) = self.routes.iter().find(|r| r.id == bus.route) {
                if route.path.len() >= 2 {
                    let travel_degrees = bus.speed * dt_hours * DEG_PER_KM;
                    move_along_route(bus, &route.path, travel_degrees);
                }
            }

            if state.rng.gen_bool(self.params.status_flip_probability) {
                let old = bus.status;
                bus.status = *BusStatus::ALL.choose(&mut state.rng).unwrap_or(&old);
                if old != bus.status {
                    if !bus.status.is_active() {
                        bus.speed = 0.0;
                        bus.passengers = 0;
                    }
                    state.activity.push(ActivityEntry::new(
                        "Bus Status Changed",
                        format!("Bus {} is now {}", bus.number, bus.status.label()),
                        "fas fa-bus",
                    ));
                }
            }

            if bus.status.is_active() {
                bus.passengers = state.rng.gen_range(35..45);
            }
        }
    }

    /// Tick forever at the configured interval.
    pub async fn run(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.params.tick);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }
}

/// Move a bus toward the neighbor of its nearest polyline point in the
/// current travel direction, reversing at either end of the line. The step
/// fraction is clamped so the bus never overshoots the target.
fn move_along_route(bus: &mut Bus, path: &[GeoPoint], travel_degrees: f64) {
    let Some(nearest) = nearest_point_index(path, bus.position) else {
        return;
    };

    let (target_idx, direction) = match bus.direction {
        TravelDirection::Forward if nearest + 1 < path.len() => {
            (nearest + 1, TravelDirection::Forward)
        }
        TravelDirection::Forward => (nearest - 1, TravelDirection::Reverse),
        TravelDirection::Reverse if nearest > 0 => (nearest - 1, TravelDirection::Reverse),
        TravelDirection::Reverse => (1, TravelDirection::Forward),
    };
    bus.direction = direction;

    let target = path[target_idx];
    let distance = planar_distance(bus.position, target);
    if distance <= f64::EPSILON {
        bus.position = target;
    } else {
        let fraction = (travel_degrees / distance).min(1.0);
        bus.position = GeoPoint::new(
            bus.position.lat + (target.lat - bus.position.lat) * fraction,
            bus.position.lng + (target.lng - bus.position.lng) * fraction,
        );
    }

    // Heading follows the segment around the nearest point, flipped when
    // traveling back down the line. Neighbor indices clamp at the ends.
    let prev = path[nearest.saturating_sub(1)];
    let next = path[(nearest + 1).min(path.len() - 1)];
    let mut heading = heading_degrees(prev, next);
    if direction == TravelDirection::Reverse {
        heading = normalize_degrees(heading + 180.0);
    }
    bus.heading = heading;
}

#[async_trait]
impl FleetFeed for SimulatedFleet {
    async fn buses(&self) -> Vec<Bus> {
        self.state.read().await.buses.clone()
    }

    async fn bus(&self, id: u32) -> AppResult<Bus> {
        self.state
            .read()
            .await
            .buses
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Bus not found".to_string()))
    }

    async fn routes(&self) -> Vec<FleetRoute> {
        self.routes.clone()
    }

    async fn activity(&self) -> Vec<ActivityEntry> {
        self.state.read().await.activity.entries()
    }

    async fn stats(&self) -> FleetStats {
        let state = self.state.read().await;
        FleetStats {
            total_buses: state.buses.len(),
            active_buses: state.buses.iter().filter(|b| b.status.is_active()).count(),
            last_update: state.last_update,
        }
    }

    async fn remove_bus(&self, id: u32) -> AppResult<Bus> {
        let mut state = self.state.write().await;
        let idx = state
            .buses
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound("Bus not found".to_string()))?;
        let bus = state.buses.remove(idx);
        state.activity.push(ActivityEntry::new(
            "Bus Removed",
            format!("Bus {} has been removed from the system", bus.number),
            "fas fa-trash",
        ));
        Ok(bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::activity::ACTIVITY_LOG_CAPACITY;
    use std::time::Duration;

    fn params(flip_probability: f64) -> SimParams {
        SimParams {
            tick: Duration::from_secs(1),
            status_flip_probability: flip_probability,
        }
    }

    fn straight_path() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(9.00, 38.70),
            GeoPoint::new(9.00, 38.72),
            GeoPoint::new(9.00, 38.74),
        ]
    }

    fn bus_at(position: GeoPoint) -> Bus {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bus = Bus::generate(&mut rng, 1, &["5".to_string()]);
        bus.position = position;
        bus.status = BusStatus::OnTime;
        bus.speed = 30.0;
        bus.direction = TravelDirection::Forward;
        bus
    }

    #[test]
    fn bus_approaches_its_target_monotonically() {
        let path = straight_path();
        let mut bus = bus_at(GeoPoint::new(9.0005, 38.7005));
        let target = path[1];
        let mut last = planar_distance(bus.position, target);
        for _ in 0..15 {
            move_along_route(&mut bus, &path, 0.0005);
            let now = planar_distance(bus.position, target);
            assert!(now < last, "bus moved away from its target");
            last = now;
        }
    }

    #[test]
    fn direction_reverses_at_the_end_of_the_line() {
        let path = straight_path();
        let mut bus = bus_at(path[2]);
        move_along_route(&mut bus, &path, 0.001);
        assert_eq!(bus.direction, TravelDirection::Reverse);
        // heads back toward the middle point instead of teleporting
        assert!(bus.position.lng < 38.74);
        assert!(bus.position.lng > 38.73);
        assert_eq!(bus.heading, 180.0);
    }

    #[test]
    fn direction_flips_forward_again_at_the_start() {
        let path = straight_path();
        let mut bus = bus_at(path[0]);
        bus.direction = TravelDirection::Reverse;
        move_along_route(&mut bus, &path, 0.001);
        assert_eq!(bus.direction, TravelDirection::Forward);
        assert!(bus.position.lng > 38.70);
        assert_eq!(bus.heading, 0.0);
    }

    #[test]
    fn clamped_step_stops_at_the_target_instead_of_overshooting() {
        let path = straight_path();
        let mut bus = bus_at(GeoPoint::new(9.00, 38.7199));
        // A huge travel distance still only reaches the target point.
        move_along_route(&mut bus, &path, 1.0);
        assert!((bus.position.lng - path[2].lng).abs() < 1e-9);
        assert!((bus.position.lat - path[2].lat).abs() < 1e-9);
    }

    #[tokio::test]
    async fn offline_buses_stay_put() {
        let fleet = SimulatedFleet::new(params(1.0), 5, Some(42));
        {
            let mut state = fleet.state.write().await;
            for bus in &mut state.buses {
                bus.status = BusStatus::Offline;
                bus.speed = 0.0;
            }
        }
        let before = fleet.buses().await;
        for _ in 0..10 {
            fleet.tick().await;
        }
        let after = fleet.buses().await;
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.position, a.position);
            assert_eq!(a.status, BusStatus::Offline);
        }
        assert!(fleet.activity().await.is_empty());
    }

    #[tokio::test]
    async fn active_buses_move_every_tick() {
        let fleet = SimulatedFleet::new(params(0.0), 8, Some(99));
        {
            let mut state = fleet.state.write().await;
            for bus in &mut state.buses {
                bus.status = BusStatus::OnTime;
                bus.speed = 30.0;
            }
        }
        let before = fleet.buses().await;
        fleet.tick().await;
        let after = fleet.buses().await;
        for (b, a) in before.iter().zip(&after) {
            assert_ne!(b.position, a.position, "bus {} did not move", b.id);
        }
    }

    #[tokio::test]
    async fn status_flips_fill_a_capped_activity_feed() {
        let fleet = SimulatedFleet::new(params(1.0), 10, Some(7));
        {
            let mut state = fleet.state.write().await;
            for bus in &mut state.buses {
                bus.status = BusStatus::OnTime;
            }
        }
        for _ in 0..50 {
            fleet.tick().await;
        }
        let activity = fleet.activity().await;
        assert_eq!(activity.len(), ACTIVITY_LOG_CAPACITY);
        assert_eq!(activity[0].title, "Bus Status Changed");
    }

    #[tokio::test]
    async fn removing_a_bus_appends_to_the_activity_feed() {
        let fleet = SimulatedFleet::new(params(0.0), 3, Some(1));
        let victim = fleet.buses().await[0].clone();
        let removed = fleet.remove_bus(victim.id).await.unwrap();
        assert_eq!(removed.id, victim.id);
        assert_eq!(fleet.buses().await.len(), 2);
        let activity = fleet.activity().await;
        assert_eq!(activity[0].title, "Bus Removed");
        assert!(activity[0].description.contains(&victim.number));
        assert!(fleet.remove_bus(victim.id).await.is_err());
    }

    #[tokio::test]
    async fn stats_count_only_active_buses() {
        let fleet = SimulatedFleet::new(params(0.0), 4, Some(5));
        {
            let mut state = fleet.state.write().await;
            state.buses[0].status = BusStatus::Offline;
            state.buses[1].status = BusStatus::Maintenance;
            state.buses[2].status = BusStatus::OnTime;
            state.buses[3].status = BusStatus::Delayed;
        }
        let stats = fleet.stats().await;
        assert_eq!(stats.total_buses, 4);
        assert_eq!(stats.active_buses, 2);
    }
}

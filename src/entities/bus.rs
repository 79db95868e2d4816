use chrono::{Days, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils::geo::GeoPoint;

// Rough bounding box for Addis Ababa.
const ADDIS_LAT_MIN: f64 = 8.9166;
const ADDIS_LAT_MAX: f64 = 9.0866;
const ADDIS_LNG_MIN: f64 = 38.6759;
const ADDIS_LNG_MAX: f64 = 38.8519;

const DRIVERS: [&str; 9] = [
    "Abebe Alemu",
    "Alemayehu Kebede",
    "Mesfin Asrat",
    "Sara Hailu",
    "Daniel Mekonnen",
    "Hana Worku",
    "Michael Getachew",
    "Selamawit Abebe",
    "Elias Girma",
];

const CAPACITIES: [u32; 3] = [40, 45, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusStatus {
    OnTime,
    Delayed,
    Offline,
    Maintenance,
}

impl BusStatus {
    /// Statuses a running bus can flip into.
    pub const ALL: [BusStatus; 4] = [
        BusStatus::OnTime,
        BusStatus::Delayed,
        BusStatus::Offline,
        BusStatus::Maintenance,
    ];

    /// An active bus moves and carries passengers.
    pub fn is_active(self) -> bool {
        !matches!(self, BusStatus::Offline | BusStatus::Maintenance)
    }

    /// Human wording for activity descriptions ("on time", not "on-time").
    pub fn label(self) -> &'static str {
        match self {
            BusStatus::OnTime => "on time",
            BusStatus::Delayed => "delayed",
            BusStatus::Offline => "offline",
            BusStatus::Maintenance => "maintenance",
        }
    }
}

/// Which way along its route polyline a bus is currently traveling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TravelDirection {
    #[default]
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: u32,
    pub number: String,
    pub route: String,
    pub position: GeoPoint,
    /// Degrees from east, counterclockwise, in (-180, 180].
    pub heading: f64,
    pub status: BusStatus,
    /// km/h.
    pub speed: f64,
    pub driver: String,
    pub passengers: u32,
    pub capacity: u32,
    pub fuel_level: u32,
    pub mileage: u32,
    pub last_maintenance: NaiveDate,
    pub maintenance_due: NaiveDate,
    #[serde(skip)]
    pub direction: TravelDirection,
}

impl Bus {
    /// Generate one bus with realistic random properties, assigned to one of
    /// the given route ids.
    pub fn generate<R: Rng>(rng: &mut R, id: u32, route_ids: &[String]) -> Bus {
        let route = route_ids
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| "5".to_string());
        // New buses start in one of the three operational statuses; the
        // simulation can flip them into maintenance later.
        let status = *[BusStatus::OnTime, BusStatus::Delayed, BusStatus::Offline]
            .choose(rng)
            .unwrap_or(&BusStatus::OnTime);
        let speed = speed_for(rng, status);
        let today = Utc::now().date_naive();

        Bus {
            id,
            number: format!("AA-{}", rng.gen_range(100..1000)),
            route,
            position: GeoPoint::new(
                rng.gen_range(ADDIS_LAT_MIN..ADDIS_LAT_MAX),
                rng.gen_range(ADDIS_LNG_MIN..ADDIS_LNG_MAX),
            ),
            heading: 0.0,
            status,
            speed,
            driver: DRIVERS
                .choose(rng)
                .copied()
                .unwrap_or("Abebe Alemu")
                .to_string(),
            passengers: if status.is_active() {
                rng.gen_range(0..50)
            } else {
                0
            },
            capacity: *CAPACITIES.choose(rng).unwrap_or(&40),
            fuel_level: rng.gen_range(0..100),
            mileage: rng.gen_range(0..50_000),
            last_maintenance: today
                .checked_sub_days(Days::new(rng.gen_range(0..90)))
                .unwrap_or(today),
            maintenance_due: today
                .checked_add_days(Days::new(rng.gen_range(1..31)))
                .unwrap_or(today),
            direction: TravelDirection::Forward,
        }
    }
}

/// Speed band per status: offline buses stand still, delayed ones crawl.
pub fn speed_for<R: Rng>(rng: &mut R, status: BusStatus) -> f64 {
    match status {
        BusStatus::Offline | BusStatus::Maintenance => 0.0,
        BusStatus::Delayed => rng.gen_range(5..25) as f64,
        BusStatus::OnTime => rng.gen_range(15..45) as f64,
    }
}

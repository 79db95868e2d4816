pub mod activity;
pub mod booking;
pub mod bus;
pub mod fleet_route;
pub mod route;
pub mod seat;
pub mod user;

//! Table generators for the FleetLogix dataset.
//!
//! Master tables come first and are independent of each other:
//! - [`VehicleGenerator`]: fixed fleet mix with type-bounded capacities
//! - [`DriverGenerator`]: drivers with licences valid through the window
//! - [`RouteGenerator`]: variants of every ordered city pair
//!
//! Transactional tables read the finished master tables:
//! - [`TripGenerator`]: demand-weighted departures, derived arrivals
//! - [`DeliveryGenerator`]: exact-count deliveries splitting each trip's load
//! - [`MaintenanceGenerator`]: exact-count service history by trip volume

pub mod delivery;
pub mod driver;
pub mod index;
pub mod maintenance;
pub mod route;
pub mod trip;
pub mod vehicle;

pub use delivery::{DeliveryGenConfig, DeliveryGenerator, GeneratedDelivery, draw_counts};
pub use driver::{DriverGenConfig, DriverGenerator, GeneratedDriver};
pub use index::{IdIndex, Keyed};
pub use maintenance::{GeneratedMaintenance, MaintenanceGenConfig, MaintenanceGenerator};
pub use route::{GeneratedRoute, RouteGenConfig, RouteGenerator};
pub use trip::{GeneratedTrip, TripGenConfig, TripGenerator};
pub use vehicle::{GeneratedVehicle, VehicleGenConfig, VehicleGenerator};

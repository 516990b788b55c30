//! The six generated tables of one run.

use serde::Serialize;

use fleetlogix::models::Table;

use crate::generators::{
    GeneratedDelivery, GeneratedDriver, GeneratedMaintenance, GeneratedRoute, GeneratedTrip,
    GeneratedVehicle,
};

/// A complete in-memory dataset, tables in load order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub vehicles: Vec<GeneratedVehicle>,
    pub drivers: Vec<GeneratedDriver>,
    pub routes: Vec<GeneratedRoute>,
    pub trips: Vec<GeneratedTrip>,
    pub deliveries: Vec<GeneratedDelivery>,
    pub maintenance: Vec<GeneratedMaintenance>,
}

impl Dataset {
    pub fn row_count(&self, table: Table) -> usize {
        match table {
            Table::Vehicles => self.vehicles.len(),
            Table::Drivers => self.drivers.len(),
            Table::Routes => self.routes.len(),
            Table::Trips => self.trips.len(),
            Table::Deliveries => self.deliveries.len(),
            Table::Maintenance => self.maintenance.len(),
        }
    }

    pub fn total_rows(&self) -> usize {
        Table::LOAD_ORDER.iter().map(|t| self.row_count(*t)).sum()
    }
}

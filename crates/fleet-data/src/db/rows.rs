//! Column layout of each generated row type.

use sqlx::Postgres;
use sqlx::query_builder::Separated;

use fleetlogix::models::Table;

use crate::generators::{
    GeneratedDelivery, GeneratedDriver, GeneratedMaintenance, GeneratedRoute, GeneratedTrip,
    GeneratedVehicle,
};

/// A generated row that can be written as one tuple of a multi-row insert.
pub trait TableRow {
    const TABLE: Table;

    /// Column names in bind order. The first column is the primary key.
    const COLUMNS: &'static [&'static str];

    fn bind<'args>(&'args self, row: Separated<'_, 'args, Postgres, &'static str>);
}

impl TableRow for GeneratedVehicle {
    const TABLE: Table = Table::Vehicles;
    const COLUMNS: &'static [&'static str] = &[
        "vehicle_id",
        "license_plate",
        "vehicle_type",
        "capacity_kg",
        "fuel_type",
        "acquisition_date",
        "status",
    ];

    fn bind<'args>(&'args self, mut row: Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.license_plate.as_str())
            .push_bind(self.vehicle_type.as_str())
            .push_bind(self.capacity_kg)
            .push_bind(self.fuel_type.as_str())
            .push_bind(self.acquisition_date)
            .push_bind(self.status.as_str());
    }
}

impl TableRow for GeneratedDriver {
    const TABLE: Table = Table::Drivers;
    const COLUMNS: &'static [&'static str] = &[
        "driver_id",
        "employee_code",
        "first_name",
        "last_name",
        "license_number",
        "license_expiry",
        "phone",
        "hire_date",
        "status",
    ];

    fn bind<'args>(&'args self, mut row: Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.employee_code.as_str())
            .push_bind(self.first_name.as_str())
            .push_bind(self.last_name.as_str())
            .push_bind(self.license_number.as_str())
            .push_bind(self.license_expiry)
            .push_bind(self.phone.as_str())
            .push_bind(self.hire_date)
            .push_bind(self.status.as_str());
    }
}

impl TableRow for GeneratedRoute {
    const TABLE: Table = Table::Routes;
    const COLUMNS: &'static [&'static str] = &[
        "route_id",
        "route_code",
        "origin_city",
        "destination_city",
        "distance_km",
        "estimated_duration_hours",
        "toll_cost",
    ];

    fn bind<'args>(&'args self, mut row: Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.route_code.as_str())
            .push_bind(self.origin_city.as_str())
            .push_bind(self.destination_city.as_str())
            .push_bind(self.distance_km)
            .push_bind(self.estimated_duration_hours)
            .push_bind(self.toll_cost);
    }
}

impl TableRow for GeneratedTrip {
    const TABLE: Table = Table::Trips;
    const COLUMNS: &'static [&'static str] = &[
        "trip_id",
        "vehicle_id",
        "driver_id",
        "route_id",
        "departure_datetime",
        "arrival_datetime",
        "fuel_consumed_liters",
        "total_weight_kg",
        "status",
    ];

    fn bind<'args>(&'args self, mut row: Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.vehicle_id)
            .push_bind(self.driver_id)
            .push_bind(self.route_id)
            .push_bind(self.departure)
            .push_bind(self.arrival)
            .push_bind(self.fuel_consumed_liters)
            .push_bind(self.total_weight_kg)
            .push_bind(self.status.as_str());
    }
}

impl TableRow for GeneratedDelivery {
    const TABLE: Table = Table::Deliveries;
    const COLUMNS: &'static [&'static str] = &[
        "delivery_id",
        "trip_id",
        "tracking_number",
        "customer_name",
        "delivery_address",
        "package_weight_kg",
        "scheduled_datetime",
        "delivered_datetime",
        "delivery_status",
        "recipient_signature",
    ];

    fn bind<'args>(&'args self, mut row: Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.trip_id)
            .push_bind(self.tracking_number.as_str())
            .push_bind(self.customer_name.as_str())
            .push_bind(self.delivery_address.as_str())
            .push_bind(self.package_weight_kg)
            .push_bind(self.scheduled)
            .push_bind(self.delivered)
            .push_bind(self.status.as_str())
            .push_bind(self.recipient_signature);
    }
}

impl TableRow for GeneratedMaintenance {
    const TABLE: Table = Table::Maintenance;
    const COLUMNS: &'static [&'static str] = &[
        "maintenance_id",
        "vehicle_id",
        "maintenance_date",
        "maintenance_type",
        "description",
        "cost",
        "next_maintenance_date",
        "performed_by",
    ];

    fn bind<'args>(&'args self, mut row: Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.vehicle_id)
            .push_bind(self.maintenance_date)
            .push_bind(self.maintenance_type.as_str())
            .push_bind(self.description.as_str())
            .push_bind(self.cost)
            .push_bind(self.next_maintenance_date)
            .push_bind(self.performed_by.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary_key<R: TableRow>() -> &'static str {
        R::COLUMNS[0]
    }

    #[test]
    fn test_primary_key_leads_each_layout() {
        assert_eq!(primary_key::<GeneratedVehicle>(), "vehicle_id");
        assert_eq!(primary_key::<GeneratedDriver>(), "driver_id");
        assert_eq!(primary_key::<GeneratedRoute>(), "route_id");
        assert_eq!(primary_key::<GeneratedTrip>(), "trip_id");
        assert_eq!(primary_key::<GeneratedDelivery>(), "delivery_id");
        assert_eq!(primary_key::<GeneratedMaintenance>(), "maintenance_id");
    }

    #[test]
    fn test_widest_batch_fits_bind_limit() {
        let widest = [
            GeneratedVehicle::COLUMNS.len(),
            GeneratedDriver::COLUMNS.len(),
            GeneratedRoute::COLUMNS.len(),
            GeneratedTrip::COLUMNS.len(),
            GeneratedDelivery::COLUMNS.len(),
            GeneratedMaintenance::COLUMNS.len(),
        ]
        .into_iter()
        .max()
        .unwrap();

        assert!(widest * crate::config::MAX_BATCH_SIZE <= u16::MAX as usize);
    }
}

use serde::{Deserialize, Serialize};

/// Vehicle classes operated by the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    LargeTruck,
    MediumTruck,
    Van,
    Motorcycle,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::LargeTruck,
        VehicleType::MediumTruck,
        VehicleType::Van,
        VehicleType::Motorcycle,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::LargeTruck => "Large Truck",
            VehicleType::MediumTruck => "Medium Truck",
            VehicleType::Van => "Van",
            VehicleType::Motorcycle => "Motorcycle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Diesel,
    Gasoline,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Diesel => "diesel",
            FuelType::Gasoline => "gasoline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Active,
    Inactive,
    Maintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Inactive => "inactive",
            VehicleStatus::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Active,
    Inactive,
    OnLeave,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Active => "active",
            DriverStatus::Inactive => "inactive",
            DriverStatus::OnLeave => "on_leave",
        }
    }
}

/// Trip lifecycle state. Governs whether the arrival timestamp is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Completed,
    InProgress,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Completed => "completed",
            TripStatus::InProgress => "in_progress",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    Pending,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Failed => "failed",
        }
    }
}

/// Kinds of workshop intervention recorded in the maintenance log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    OilChange,
    BrakeInspection,
    TireReplacement,
    GeneralService,
    EngineInspection,
    AlignmentAndBalancing,
}

impl MaintenanceType {
    pub const ALL: [MaintenanceType; 6] = [
        MaintenanceType::OilChange,
        MaintenanceType::BrakeInspection,
        MaintenanceType::TireReplacement,
        MaintenanceType::GeneralService,
        MaintenanceType::EngineInspection,
        MaintenanceType::AlignmentAndBalancing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::OilChange => "Oil Change",
            MaintenanceType::BrakeInspection => "Brake Inspection",
            MaintenanceType::TireReplacement => "Tire Replacement",
            MaintenanceType::GeneralService => "General Service",
            MaintenanceType::EngineInspection => "Engine Inspection",
            MaintenanceType::AlignmentAndBalancing => "Alignment and Balancing",
        }
    }
}

/// The six relational tables, in load order (parents before children).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Vehicles,
    Drivers,
    Routes,
    Trips,
    Deliveries,
    Maintenance,
}

impl Table {
    pub const LOAD_ORDER: [Table; 6] = [
        Table::Vehicles,
        Table::Drivers,
        Table::Routes,
        Table::Trips,
        Table::Deliveries,
        Table::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Vehicles => "vehicles",
            Table::Drivers => "drivers",
            Table::Routes => "routes",
            Table::Trips => "trips",
            Table::Deliveries => "deliveries",
            Table::Maintenance => "maintenance",
        }
    }
}

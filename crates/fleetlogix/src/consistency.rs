//! Read-only post-load audit of the FleetLogix tables.
//!
//! Every check is a single aggregate query that counts violating rows, so a
//! clean dataset yields zero for each of them.

use time::PrimitiveDateTime;
use tracing::{info, warn};

use crate::database::Database;
use crate::errors::FleetError;
use crate::models::{MaintenanceType, Table, VehicleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckCategory {
    Referential,
    Temporal,
    Uniqueness,
    Weight,
    Range,
    Date,
    Cardinality,
}

impl CheckCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckCategory::Referential => "referential",
            CheckCategory::Temporal => "temporal",
            CheckCategory::Uniqueness => "uniqueness",
            CheckCategory::Weight => "weight",
            CheckCategory::Range => "range",
            CheckCategory::Date => "date",
            CheckCategory::Cardinality => "cardinality",
        }
    }
}

/// Parameters a check query expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Params {
    None,
    /// `$1` = window start date.
    WindowStartDate,
    /// `$1` = window start, `$2` = window end.
    Window,
}

/// A named violation-counting query.
#[derive(Debug, Clone)]
pub struct ConsistencyCheck {
    pub name: &'static str,
    pub category: CheckCategory,
    sql: String,
    params: Params,
}

impl ConsistencyCheck {
    fn new(name: &'static str, category: CheckCategory, sql: impl Into<String>) -> Self {
        Self {
            name,
            category,
            sql: sql.into(),
            params: Params::None,
        }
    }

    fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// The simulated period the audit compares timestamps against.
#[derive(Debug, Clone, Copy)]
pub struct ValidationWindow {
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub category: CheckCategory,
    pub violations: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub table_counts: Vec<(Table, i64)>,
    pub checks: Vec<CheckResult>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.violations == 0)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| c.violations > 0)
    }

    pub fn count_of(&self, table: Table) -> Option<i64> {
        self.table_counts
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, n)| *n)
    }
}

/// Builds a `CASE vehicle_type ... END` expression mapping each type label to a value.
fn vehicle_type_case(column: &str, value: impl Fn(VehicleType) -> f64) -> String {
    let arms: Vec<String> = VehicleType::ALL
        .iter()
        .map(|t| format!("WHEN '{}' THEN {}", t.as_str(), value(*t)))
        .collect();
    format!("CASE {column} {} ELSE NULL END", arms.join(" "))
}

fn duplicates(table: &str, column: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM (SELECT {column} FROM {table} GROUP BY {column} HAVING COUNT(*) > 1) duplicates"
    )
}

fn orphans(child: &str, parent: &str, key: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM {child} c WHERE NOT EXISTS (SELECT 1 FROM {parent} p WHERE p.{key} = c.{key})"
    )
}

/// Returns the full catalog of checks, in reporting order.
pub fn checks() -> Vec<ConsistencyCheck> {
    use CheckCategory::*;

    let min_capacity = vehicle_type_case("v.vehicle_type", |t| t.spec().capacity_kg.0);
    let max_capacity = vehicle_type_case("v.vehicle_type", |t| t.spec().capacity_kg.1);
    let efficiency = vehicle_type_case("v.vehicle_type", |t| t.spec().km_per_liter);
    let maintenance_labels: Vec<String> = MaintenanceType::ALL
        .iter()
        .map(|t| format!("'{}'", t.as_str()))
        .collect();

    vec![
        // Referential integrity
        ConsistencyCheck::new(
            "trips reference existing vehicles",
            Referential,
            orphans("trips", "vehicles", "vehicle_id"),
        ),
        ConsistencyCheck::new(
            "trips reference existing drivers",
            Referential,
            orphans("trips", "drivers", "driver_id"),
        ),
        ConsistencyCheck::new(
            "trips reference existing routes",
            Referential,
            orphans("trips", "routes", "route_id"),
        ),
        ConsistencyCheck::new(
            "deliveries reference existing trips",
            Referential,
            orphans("deliveries", "trips", "trip_id"),
        ),
        ConsistencyCheck::new(
            "maintenance references existing vehicles",
            Referential,
            orphans("maintenance", "vehicles", "vehicle_id"),
        ),
        // Temporal ordering
        ConsistencyCheck::new(
            "arrival is after departure",
            Temporal,
            r#"
            SELECT COUNT(*) FROM trips
            WHERE arrival_datetime IS NOT NULL
              AND arrival_datetime <= departure_datetime
            "#,
        ),
        ConsistencyCheck::new(
            "no departures in the future",
            Temporal,
            "SELECT COUNT(*) FROM trips WHERE departure_datetime > LOCALTIMESTAMP",
        ),
        ConsistencyCheck::new(
            "departures fall inside the operational window",
            Temporal,
            "SELECT COUNT(*) FROM trips WHERE departure_datetime < $1 OR departure_datetime > $2",
        )
        .with_params(Params::Window),
        ConsistencyCheck::new(
            "trip status agrees with arrival",
            Temporal,
            r#"
            SELECT COUNT(*) FROM trips
            WHERE (status = 'in_progress' AND arrival_datetime IS NOT NULL)
               OR (status = 'completed' AND arrival_datetime IS NULL)
            "#,
        ),
        ConsistencyCheck::new(
            "delivered is not before scheduled",
            Temporal,
            r#"
            SELECT COUNT(*) FROM deliveries
            WHERE delivered_datetime IS NOT NULL
              AND delivered_datetime < scheduled_datetime
            "#,
        ),
        // Uniqueness
        ConsistencyCheck::new(
            "license plates are unique",
            Uniqueness,
            duplicates("vehicles", "license_plate"),
        ),
        ConsistencyCheck::new(
            "employee codes are unique",
            Uniqueness,
            duplicates("drivers", "employee_code"),
        ),
        ConsistencyCheck::new(
            "driver license numbers are unique",
            Uniqueness,
            duplicates("drivers", "license_number"),
        ),
        ConsistencyCheck::new(
            "tracking numbers are unique",
            Uniqueness,
            duplicates("deliveries", "tracking_number"),
        ),
        // Weights
        ConsistencyCheck::new(
            "delivery weights fit their trip",
            Weight,
            r#"
            SELECT COUNT(*) FROM (
                SELECT t.trip_id
                FROM trips t
                LEFT JOIN deliveries d ON t.trip_id = d.trip_id
                GROUP BY t.trip_id, t.total_weight_kg
                HAVING COALESCE(SUM(d.package_weight_kg), 0) > t.total_weight_kg * 1.01
            ) weight_errors
            "#,
        ),
        ConsistencyCheck::new(
            "trip weight fits vehicle capacity",
            Weight,
            r#"
            SELECT COUNT(*) FROM trips t
            JOIN vehicles v ON v.vehicle_id = t.vehicle_id
            WHERE t.total_weight_kg > v.capacity_kg
            "#,
        ),
        // Value ranges
        ConsistencyCheck::new(
            "capacity within vehicle type range",
            Range,
            format!(
                "SELECT COUNT(*) FROM vehicles v \
                 WHERE {min_capacity} IS NULL \
                    OR v.capacity_kg < {min_capacity} \
                    OR v.capacity_kg > {max_capacity}"
            ),
        ),
        ConsistencyCheck::new(
            "fuel consumption matches efficiency",
            Range,
            format!(
                "SELECT COUNT(*) FROM trips t \
                 JOIN vehicles v ON v.vehicle_id = t.vehicle_id \
                 JOIN routes r ON r.route_id = t.route_id \
                 WHERE t.fuel_consumed_liters IS NULL \
                    OR {efficiency} IS NULL \
                    OR t.fuel_consumed_liters < 0.8 * r.distance_km / {efficiency} - 0.01 \
                    OR t.fuel_consumed_liters > 1.1 * r.distance_km / {efficiency} + 0.01"
            ),
        ),
        ConsistencyCheck::new(
            "route distances are plausible",
            Range,
            "SELECT COUNT(*) FROM routes WHERE distance_km <= 0 OR distance_km > 500",
        ),
        ConsistencyCheck::new(
            "trip weights are plausible",
            Range,
            "SELECT COUNT(*) FROM trips WHERE total_weight_kg <= 0 OR total_weight_kg > 15000",
        ),
        ConsistencyCheck::new(
            "maintenance types are known",
            Range,
            format!(
                "SELECT COUNT(*) FROM maintenance WHERE maintenance_type NOT IN ({})",
                maintenance_labels.join(", ")
            ),
        ),
        // Dates
        ConsistencyCheck::new(
            "licenses valid for the whole window",
            Date,
            "SELECT COUNT(*) FROM drivers WHERE license_expiry < $1",
        )
        .with_params(Params::WindowStartDate),
        ConsistencyCheck::new(
            "next maintenance after maintenance date",
            Date,
            r#"
            SELECT COUNT(*) FROM maintenance
            WHERE next_maintenance_date IS NULL
               OR next_maintenance_date <= maintenance_date
            "#,
        ),
        // Cardinality
        ConsistencyCheck::new(
            "two to six deliveries per trip",
            Cardinality,
            r#"
            SELECT COUNT(*) FROM (
                SELECT t.trip_id
                FROM trips t
                LEFT JOIN deliveries d ON t.trip_id = d.trip_id
                GROUP BY t.trip_id
                HAVING COUNT(d.delivery_id) NOT BETWEEN 2 AND 6
            ) cardinality_errors
            "#,
        ),
    ]
}

/// Runs the consistency catalog against a loaded database.
pub struct ConsistencyValidator {
    db: Database,
}

impl ConsistencyValidator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Counts rows per table, then runs every check.
    pub async fn run(&self, window: &ValidationWindow) -> Result<ValidationReport, FleetError> {
        info!("Validating data consistency...");
        let mut report = ValidationReport::default();

        for table in Table::LOAD_ORDER {
            let count = self.db.row_count(table).await?;
            info!("  {}: {} rows", table.as_str(), count);
            report.table_counts.push((table, count));
        }

        for check in checks() {
            let violations = self.count_violations(&check, window).await?;

            if violations > 0 {
                warn!(
                    "  [{}] {}: {} violations",
                    check.category.as_str(),
                    check.name,
                    violations
                );
            } else {
                info!("  [{}] {}: ok", check.category.as_str(), check.name);
            }

            report.checks.push(CheckResult {
                name: check.name,
                category: check.category,
                violations,
            });
        }

        if report.passed() {
            info!("Validation passed: all {} checks clean", report.checks.len());
        } else {
            warn!(
                "Validation finished with {} failing checks",
                report.failures().count()
            );
        }

        Ok(report)
    }

    async fn count_violations(
        &self,
        check: &ConsistencyCheck,
        window: &ValidationWindow,
    ) -> Result<i64, FleetError> {
        let query = sqlx::query_scalar::<_, i64>(check.sql());
        let query = match check.params {
            Params::None => query,
            Params::WindowStartDate => query.bind(window.start.date()),
            Params::Window => query.bind(window.start).bind(window.end),
        };

        Ok(query.fetch_one(self.db.pool()).await?)
    }
}

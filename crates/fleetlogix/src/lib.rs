//! FleetLogix domain crate.
//!
//! Holds the fleet's reference catalog, the categorical vocabulary shared by
//! every table, the relational schema, and the post-load consistency audit.

pub mod catalog;
pub mod consistency;
pub mod database;
pub mod errors;
pub mod models;

pub use errors::FleetError;

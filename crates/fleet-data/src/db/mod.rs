//! Database seeding for generated datasets.

mod rows;
mod seeder;

pub use rows::TableRow;
pub use seeder::{SeedError, Seeder};

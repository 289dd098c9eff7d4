pub mod database;
pub mod seed;
pub mod services;
pub mod utils;

pub use database::Database;

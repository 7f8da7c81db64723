pub mod config;
pub mod csv_export;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

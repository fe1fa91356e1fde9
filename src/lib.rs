pub mod app;
pub mod config;
pub mod database;
pub mod date;
pub mod error;
pub mod models;
pub mod routes;
pub mod weather;

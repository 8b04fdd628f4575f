//! SaveMyWines backend
//!
//! HTTP services behind the SaveMyWines collection tracker: label scanning
//! (object storage + Google Cloud Vision + heuristic field extraction) and
//! per-device wine records in PostgreSQL.

pub mod app_state;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;

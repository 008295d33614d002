//! Personal diet-tracking HTTP API.
//!
//! Users register once, get a session cookie back, and record meals flagged
//! as on-diet or not. A metrics route summarizes adherence, including the
//! longest on-diet streak. Storage is SQLite or Postgres behind one sqlx
//! `AnyPool`, chosen by configuration at startup.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod meals;
pub mod users;

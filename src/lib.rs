#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "A minimal task-management REST backend: JWT authentication and CRUD over"]
#![doc = "task resources. The store seam (`store::TaskStore` / `store::UserStore`)"]
#![doc = "separates the handlers from the persistence engine; `main.rs` wires the"]
#![doc = "Postgres implementation, the integration tests wire the in-memory one."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

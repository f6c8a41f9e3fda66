//! Persistence for the exercise catalog.
//!
//! Connection configuration, pool construction, embedded migrations, the
//! [`models::Exercise`] row type, and query functions over the `exercise`
//! table.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;

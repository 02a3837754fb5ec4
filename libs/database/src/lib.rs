//! Postgres connectivity shared by the gateway and its domain crates.
//!
//! # Features
//!
//! - `postgres` (default) - SeaORM connection pool, migrations, health checks
//!   and the generic [`BaseRepository`]
//! - `config` - `core_config::FromEnv` support for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "gateway_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub mod repository;

pub use common::DatabaseError;

#[cfg(feature = "postgres")]
pub use repository::BaseRepository;

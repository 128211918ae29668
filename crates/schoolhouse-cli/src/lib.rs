//! # Schoolhouse CLI
//!
//! Seeding utilities for Schoolhouse development and first-run setup.
//!
//! This library crate provides the seeding functionality used by the CLI
//! binary and by the server's `SEED_ON_STARTUP` option.
//!
//! ## Usage
//!
//! ```ignore
//! use schoolhouse_cli::seeder::{seed_all, SeedConfig};
//!
//! let summary = seed_all(&store, SeedConfig::default()).await?;
//! ```

pub mod seeder;

// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod core;
pub mod params;

pub mod model;
pub mod reconcile;
pub mod runner;
pub mod scrape;
pub mod store;

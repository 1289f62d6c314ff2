//! jobwatch - a capacity-bounded job posting notifier.
//!
//! Users store search criteria (keywords, location, country, lookback) and a
//! delivery destination; a background scheduler periodically queries the
//! JSearch provider for every due subscriber and sends fresh postings to the
//! subscriber's destination. At most a fixed number of users may be
//! subscribed at once.

pub mod config;
pub mod countries;
pub mod database;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod provider;
pub mod service;
pub mod task;

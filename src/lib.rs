//! citypay: municipal property-tax collection backend.
//!
//! The interesting part is the USSD dialog engine in [`ussd`]; the rest is
//! the plumbing around it: domain contracts, Postgres repositories, the
//! HTTP layer and configuration.

pub mod api;
pub mod config;
pub mod domain;
pub mod identity;
pub mod store;
pub mod ussd;

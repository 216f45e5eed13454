//! Storage backends for the domain contracts.

pub mod postgres;

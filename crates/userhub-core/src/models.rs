//! Domain models for UserHub.

pub mod account;

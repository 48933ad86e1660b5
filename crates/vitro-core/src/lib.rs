//! Vitro Core — domain models, shared error type, and repository traits
//! for the growth-media catalog.

pub mod error;
pub mod models;
pub mod repository;


// File: src/services/mod.rs

pub mod discord;
pub mod matcher;
pub mod outcome;
pub mod verification_service;

pub use verification_service::VerificationService;

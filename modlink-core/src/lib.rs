// src/lib.rs

pub mod config;
pub mod modmail;
pub mod platforms;
pub mod services;
pub mod test_utils;

pub use config::BotConfig;
pub use modlink_common::error::Error;

pub mod client;
pub mod convert;
pub mod runtime;

pub use client::DiscordHttp;
pub use runtime::DiscordPlatform;

pub mod command_handler;
pub mod commands;
pub mod discord_event_service;
pub mod reply;

pub use command_handler::{CommandHandler, DiscordMessageEvent};
pub use discord_event_service::DiscordEventService;

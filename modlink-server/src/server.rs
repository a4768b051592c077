use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use modlink_common::traits::MemberApi;
use modlink_core::platforms::discord::DiscordPlatform;
use modlink_core::platforms::PlatformIntegration;
use modlink_core::services::discord::{CommandHandler, DiscordEventService};
use modlink_core::Error;

use crate::context::ServerContext;
use crate::Args;

pub async fn run_server(args: Args) -> Result<(), Error> {
    let ctx = ServerContext::new(&args)?;

    if let (Some(channel), Some(seconds)) = (&ctx.config.verify_channel_id, ctx.config.slowmode_secs) {
        match ctx.discord.set_slowmode(channel, seconds).await {
            Ok(()) => info!("Slowmode on verify channel {} set to {}s", channel, seconds),
            Err(e) => warn!("Could not set slowmode on verify channel {}: {:?}", channel, e),
        }
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let handler = Arc::new(CommandHandler::new(ctx.verification.clone()));
    let event_service = DiscordEventService::new(rx, handler);

    let mut platform = DiscordPlatform::new(ctx.token.clone(), ctx.http.clone(), tx);
    platform.connect().await?;

    let event_task = tokio::spawn(event_service.start());

    info!("modlink is running. Press Ctrl+C to stop.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {:?}", e);
    }
    info!("Shutting down...");

    if let Err(e) = platform.disconnect().await {
        warn!("Discord disconnect failed: {:?}", e);
    }
    // The shard runners held the only senders; once they exit the listener drains and stops.
    drop(platform);
    if let Err(e) = event_task.await {
        warn!("Event listener ended abnormally: {:?}", e);
    }

    info!("Shutdown complete.");
    Ok(())
}

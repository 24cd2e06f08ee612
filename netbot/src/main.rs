//! netbot: Telegram front-end for device lookups.
//!
//! Configuration comes from `NETBOT_*` environment variables, see
//! [`netbot::config`]. Logging follows `RUST_LOG` (default `info`).

use std::sync::Arc;

use log::{error, info};

use netbot::chat::telegram::run_polling;
use netbot::chat::{Dispatcher, TelegramClient};
use netbot::{BotConfig, DeviceCollector};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> netbot::Result<()> {
    let config = BotConfig::from_env()?;
    info!(
        "devices: user {}, port {}, host keys {:?}",
        config.device.credentials.username,
        config.device.port,
        config.device.host_key_verification
    );

    let collector = Arc::new(DeviceCollector::ssh(config.device));
    let client = Arc::new(TelegramClient::new(config.telegram)?);
    let dispatcher = Dispatcher::new(collector, client.clone());

    run_polling(client, dispatcher, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("cannot listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    })
    .await
}

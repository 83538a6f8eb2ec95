use anyhow::{Context, Result};
use babel_bot::bot::Bot;
use babel_bot::config::Config;
use babel_bot::server;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::filter::{Directive, LevelFilter};

#[tokio::main]
async fn main() {
    // Load .env file (ignored when the variables come from the environment)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "babel_bot=info"
                    .parse::<Directive>()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        std::process::exit(4);
    }
}

async fn run(config: Config) -> Result<()> {
    info!(
        "Starting babel-bot (prefix {:?}, port {})",
        config.command_prefix, config.port
    );

    let port = config.port;
    let bot = Arc::new(Bot::new(config));

    if let Some(url) = bot.config().webhook_url.as_deref() {
        bot.telegram()
            .set_webhook(url, bot.config().webhook_secret.as_deref())
            .await
            .context("Failed to register webhook")?;
        info!("Webhook registered at {}", url);
    }

    server::serve(bot, port).await?;

    info!("Stopped");
    Ok(())
}

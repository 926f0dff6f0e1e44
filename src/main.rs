use anyhow::Result;
use gazette::{
    config::Config,
    mail::GmailClient,
    newsletter::{DigestOptions, LookbackWindow, fetch_newsletters_at, sender_display_name},
};
use tracing::{info, warn};

const ENV_LOG_JSON: &str = "DIGEST_LOG_JSON";

fn init_tracing() {
    let json = std::env::var(ENV_LOG_JSON).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    if config.access_token().is_empty() {
        warn!("GMAIL_ACCESS_TOKEN is not set, requests will be rejected");
    }

    let client = GmailClient::from_config(&config)?;
    let window = LookbackWindow::now(config.hours_back());
    let options = DigestOptions {
        max_content_length: config.max_content_length(),
        ..DigestOptions::default()
    };

    let digest = fetch_newsletters_at(&client, &window, config.senders(), &options).await;
    for group in digest.newsletters_by_sender.iter() {
        info!(
            "{}: {} newsletters",
            sender_display_name(&group.sender),
            group.newsletters.len()
        );
    }

    println!("{}", serde_json::to_string_pretty(&digest)?);
    Ok(())
}

//! # Chat Client
//!
//! Signs in, stores the signed session in a file, fetches the chat history
//! of a channel and prints it as JSON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chat_service::{GetChatHistoryRequest, SignInRequest, GET_CHAT_HISTORY, SIGN_IN};
use svc_client::{FileSessionStorage, ServiceClient};

/// Chat demo client
#[derive(Parser, Debug)]
#[command(name = "chat-client")]
#[command(about = "Sign in to the chat server and print a channel's history")]
struct Args {
    /// Server origin
    #[arg(short, long, default_value = "http://localhost:80")]
    origin: String,

    /// Account email
    #[arg(short, long, default_value = "me@email.com")]
    email: String,

    /// Account password
    #[arg(short, long, default_value = "correct password")]
    password: String,

    /// Channel to read
    #[arg(short, long, default_value = "my channel")]
    channel: String,

    /// File holding the signed session between runs
    #[arg(long, default_value = ".chat-session")]
    session_file: PathBuf,

    /// Reuse a stored session instead of signing in
    #[arg(long)]
    reuse_session: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let storage = FileSessionStorage::new(&args.session_file);
    let client = ServiceClient::new(&args.origin, storage).context("failed to build client")?;

    if !(args.reuse_session && client.has_session()?) {
        let response = client
            .fetch_unauthed(
                &SignInRequest {
                    email: Some(args.email.clone()),
                    password: Some(args.password.clone()),
                },
                &SIGN_IN,
            )
            .await
            .context("sign in failed")?;

        let Some(token) = response.signed_session else {
            bail!("sign in rejected for {}", args.email);
        };
        client.save_session(&token)?;
    }

    let history = client
        .fetch_authed(
            &GetChatHistoryRequest {
                channel_id: Some(args.channel.clone()),
                ..Default::default()
            },
            &GET_CHAT_HISTORY,
        )
        .await
        .context("failed to fetch chat history")?;

    let raw = svc_descriptor::serialize_message(&history)?;
    println!("{}", serde_json::to_string(&raw)?);
    Ok(())
}

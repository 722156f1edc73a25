//! Login demo
//!
//! Logs in to the chat adapter and prints what the realtime connector would
//! be given.
//!
//! Run with: cargo run --example login -- <account> <password> [host:port]

use anyhow::{bail, Context};
use chat_adapter_http::api::{ChatAdapter, ChatAdapterApi, DEFAULT_ADDRESS, ENTRY_ROUTE};
use chat_adapter_http::client::{HttpClient, MainQueue};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(account), Some(password)) = (args.next(), args.next()) else {
        bail!("usage: login <account> <password> [host:port]");
    };
    let address = args.next().unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

    let api = ChatAdapterApi::from_address(&address).context("invalid chat adapter address")?;
    let (mut main_loop, main) = MainQueue::new();
    let adapter = ChatAdapter::new(api, HttpClient::new(), Arc::new(main));

    let _task = adapter.request_login(&account, &password, |result| match result {
        Ok(info) => {
            println!("Connect to {}", info.server_address());
            println!("  {} {:?}", ENTRY_ROUTE, info.entry_params());
        }
        Err(e) => println!("Login failed: {}", e),
    })?;

    // Drop our handle so the loop ends after the single completion.
    drop(adapter);
    while main_loop.run_next().await {}

    Ok(())
}

//! CLI for mqclient
//!
//! Subcommands:
//! - `serve`: run the in-memory reference broker
//! - `echo`: publish a batch of messages to a topic and read them back
//!   (useful for smoke tests against any broker)

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use mqclient::broker::Broker;
use mqclient::config::{Settings, load_config};
use mqclient::transport::start_server;
use mqclient::{Client, Message};
use parking_lot::Mutex;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "mqclient")]
enum Command {
    /// Start the reference broker
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Publish messages to a topic this client subscribes to, and print
    /// them as they come back
    Echo {
        /// Broker host (default from configuration)
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Client queue name (default: $USER)
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "testing")]
        topic: String,
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Seconds to wait for echoes before stopping
        #[arg(long, default_value_t = 5)]
        linger: u64,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    mqclient::utils::logging::init("info");

    let cmd = Command::parse();
    let mut settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    match cmd {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.broker.host = host;
            }
            if let Some(port) = port {
                settings.broker.port = port;
            }
            if let Err(e) = run_server(settings).await {
                error!("Server failed: {}", e);
            }
        }
        Command::Echo {
            host,
            port,
            name,
            topic,
            count,
            linger,
        } => {
            let client = &mut settings.client;
            if let Some(host) = host {
                client.host = host;
            }
            if let Some(port) = port {
                client.port = port;
            }
            if let Some(name) = name {
                client.name = name;
            }
            let linger = Duration::from_secs(linger);
            let outcome =
                tokio::task::spawn_blocking(move || run_echo(settings, &topic, count, linger)).await;
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Echo failed: {}", e),
                Err(e) => error!("Echo panicked: {}", e),
            }
        }
    }
}

async fn run_server(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", settings.broker.host, settings.broker.port);
    let broker = Arc::new(Mutex::new(Broker::new()));

    tokio::select! {
        res = start_server(&addr, broker) => {
            res?;
            error!("Broker exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}

fn run_echo(
    settings: Settings,
    topic: &str,
    count: usize,
    linger: Duration,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = Arc::new(Client::with_settings(settings.client));
    client.subscribe(topic);
    client.unsubscribe(topic);
    client.subscribe(topic);
    client.start()?;

    let incoming = {
        let client = client.clone();
        thread::spawn(move || {
            let mut received = 0;
            while let Message::Data(body) = client.retrieve() {
                info!("Received: {}", String::from_utf8_lossy(&body).trim_end());
                received += 1;
            }
            received
        })
    };

    for i in 0..count {
        let body = format!("{}. Hello from {}\n", i, chrono::Utc::now().timestamp());
        client.publish(topic, body);
    }
    thread::sleep(linger);
    client.stop()?;

    let received = incoming.join().map_err(|_| "incoming thread panicked")?;
    info!("Echoed {}/{} messages on {}", received, count, topic);
    if received != count {
        return Err(format!("expected {count} messages, received {received}").into());
    }
    Ok(())
}

mod logging;
mod shutdown;

use std::future::Future;
use std::net::IpAddr;

use bridge_core::{BridgeClient, BridgeConfig, Job, RelayConfig};
use bridge_server::AppState;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::shutdown::Shutdown;

#[derive(Parser, Debug)]
#[command(name = "bridge")]
#[command(about = "Discord-to-game-server job bridge")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Run the bridge service and the Discord relay in one process (default)
    Run {
        #[command(flatten)]
        listen: ListenArgs,
        /// Bridge the relay enqueues against (defaults to this process)
        #[arg(long)]
        bridge_url: Option<String>,
    },
    /// Run only the bridge service
    Server {
        #[command(flatten)]
        listen: ListenArgs,
    },
    /// Run only the Discord relay against a remote bridge
    Bot {
        /// Overrides BRIDGE_URL
        #[arg(long)]
        bridge_url: Option<String>,
    },
    /// Queue one cleanup job directly, bypassing Discord
    Enqueue {
        /// Target user id
        #[arg(allow_negative_numbers = true)]
        user_id: i64,
        #[arg(long)]
        bridge_url: Option<String>,
    },
    /// Take all pending jobs and print them as JSON (the jobs are consumed)
    Drain {
        #[arg(long)]
        bridge_url: Option<String>,
    },
}

#[derive(clap::Args, Debug, Default, PartialEq, Eq)]
struct ListenArgs {
    /// Overrides PORT
    #[arg(long)]
    port: Option<u16>,
    /// Overrides BIND_ADDR
    #[arg(long)]
    bind: Option<IpAddr>,
}

impl ListenArgs {
    fn apply(&self, config: &mut BridgeConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();
    miette::set_panic_hook();
    let cli = Cli::parse();

    let _log_guard = logging::init_tracing(cli.debug);

    let command = cli.command.unwrap_or(Commands::Run {
        listen: ListenArgs::default(),
        bridge_url: None,
    });

    match command {
        Commands::Run { listen, bridge_url } => run_all(&listen, bridge_url).await,
        Commands::Server { listen } => run_server(&listen).await,
        Commands::Bot { bridge_url } => run_bot(bridge_url).await,
        Commands::Enqueue {
            user_id,
            bridge_url,
        } => {
            let client = operator_client(bridge_url)?;
            client.enqueue(&Job::clean(user_id)).await?;
            println!("queued cleanup for user {user_id}");
            Ok(())
        }
        Commands::Drain { bridge_url } => {
            let client = operator_client(bridge_url)?;
            let jobs = client.drain().await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&jobs).into_diagnostic()?
            );
            Ok(())
        }
    }
}

fn bridge_config(listen: &ListenArgs) -> Result<BridgeConfig> {
    let mut config = BridgeConfig::from_env()?;
    listen.apply(&mut config);
    Ok(config)
}

async fn run_server(listen: &ListenArgs) -> Result<()> {
    let config = bridge_config(listen)?;
    let shutdown = Shutdown::on_ctrl_c();
    bridge_server::serve(&config, AppState::new(&config), shutdown.wait()).await?;
    Ok(())
}

async fn run_bot(bridge_url: Option<String>) -> Result<()> {
    let config = RelayConfig::from_env()?;
    let bridge_url = bridge_url.or_else(|| config.bridge_url.clone()).ok_or_else(|| {
        miette::miette!(
            help = "Set BRIDGE_URL or pass --bridge-url",
            "The relay needs to know where the bridge is"
        )
    })?;

    let shutdown = Shutdown::on_ctrl_c();
    bridge_discord::run_relay(&config, &bridge_url, shutdown.wait()).await?;
    Ok(())
}

async fn run_all(listen: &ListenArgs, bridge_url: Option<String>) -> Result<()> {
    let bridge_config = bridge_config(listen)?;
    let relay_config = RelayConfig::from_env()?;
    let bridge_url = bridge_url
        .or_else(|| relay_config.bridge_url.clone())
        .unwrap_or_else(|| bridge_config.local_url());

    let shutdown = Shutdown::on_ctrl_c();
    let state = AppState::new(&bridge_config);

    let server = bridge_server::serve(&bridge_config, state, shutdown.wait());
    let relay = bridge_discord::run_relay(&relay_config, &bridge_url, shutdown.wait());

    run_together(server, relay).await?;
    info!("shut down");
    Ok(())
}

/// Drive both halves to completion. The first error is returned right away
/// and drops the other half; otherwise each finishes its own shutdown.
async fn run_together<A, B>(
    first: impl Future<Output = std::result::Result<(), A>>,
    second: impl Future<Output = std::result::Result<(), B>>,
) -> Result<()>
where
    A: Into<miette::Report>,
    B: Into<miette::Report>,
{
    tokio::try_join!(
        async { first.await.map_err(Into::<miette::Report>::into) },
        async { second.await.map_err(Into::<miette::Report>::into) },
    )?;
    Ok(())
}

/// Client for the one-shot operator commands.
///
/// The bridge URL comes from the flag, then BRIDGE_URL, then the local
/// bridge address implied by PORT/BIND_ADDR.
fn operator_client(bridge_url: Option<String>) -> Result<BridgeClient> {
    operator_client_from(bridge_url, |key| std::env::var(key).ok())
}

fn operator_client_from(
    bridge_url: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<BridgeClient> {
    let bridge_config = BridgeConfig::from_lookup(&lookup)?;
    let url = bridge_url
        .or_else(|| lookup("BRIDGE_URL").filter(|u| !u.trim().is_empty()))
        .unwrap_or_else(|| bridge_config.local_url());
    Ok(BridgeClient::new(url, bridge_config.secret)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["bridge"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.debug);
    }

    #[test]
    fn server_flags_override_config() {
        let cli =
            Cli::try_parse_from(["bridge", "server", "--port", "8081", "--bind", "127.0.0.1"])
                .unwrap();
        let Some(Commands::Server { listen }) = cli.command else {
            panic!("expected server command");
        };

        let mut config =
            BridgeConfig::from_lookup(|key| (key == "SECRET_KEY").then(|| "k".to_string()))
                .unwrap();
        listen.apply(&mut config);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8081");
    }

    #[test]
    fn enqueue_takes_integer_user_id() {
        let cli = Cli::try_parse_from(["bridge", "enqueue", "42", "--debug"]).unwrap();
        assert!(cli.debug);
        assert_eq!(
            cli.command,
            Some(Commands::Enqueue {
                user_id: 42,
                bridge_url: None
            })
        );
        assert!(Cli::try_parse_from(["bridge", "enqueue", "abc"]).is_err());
    }

    #[test]
    fn operator_url_falls_back_to_local_bridge() {
        let client = operator_client_from(None, |key| match key {
            "SECRET_KEY" => Some("k".to_string()),
            "PORT" => Some("4000".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:4000");

        let client = operator_client_from(None, |key| match key {
            "SECRET_KEY" => Some("k".to_string()),
            "BRIDGE_URL" => Some("https://bridge.example.com/".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(client.base_url(), "https://bridge.example.com");

        let client = operator_client_from(Some("http://10.0.0.5:3000".to_string()), |key| {
            (key == "SECRET_KEY").then(|| "k".to_string())
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.5:3000");
    }

    #[test]
    fn operator_commands_need_a_secret() {
        assert!(operator_client_from(None, |_| None).is_err());
    }

    #[tokio::test]
    async fn slower_half_finishes_after_faster_one() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let fast = async { Ok::<(), miette::Report>(()) };
        let slow = async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            Ok::<(), miette::Report>(())
        };

        run_together(fast, slow).await.unwrap();
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failing_half_ends_the_run() {
        let failing = async { Err::<(), _>(miette::miette!("relay lost its gateway")) };
        let forever = std::future::pending::<std::result::Result<(), miette::Report>>();

        let err = tokio::time::timeout(Duration::from_secs(5), run_together(forever, failing))
            .await
            .expect("a failure should not wait for the other half")
            .unwrap_err();
        assert!(err.to_string().contains("relay lost its gateway"));
    }
}

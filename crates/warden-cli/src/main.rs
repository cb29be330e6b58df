use clap::{Parser, Subcommand};
use tracing::debug;
use warden_core::{ApiClient, ServerAction, ServerId, WardenConfig};
use warden_servers::{Console, Servers};

mod tasks;

/// Command-line client for the game-server panel.
#[derive(Parser)]
#[command(name = "warden", version, about)]
struct Cli {
    /// Path to TOML configuration file. Falls back to WARDEN_CONFIG, then ~/.warden/warden.toml.
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List servers, or show one server.
    Servers {
        server_id: Option<String>,
    },

    /// Send a power action (start, stop, kill, restart).
    Power {
        server_id: String,
        action: ServerAction,
    },

    /// Print recent console output, or send a command.
    Console {
        server_id: String,
        /// Command to send instead of reading output.
        #[arg(short, long)]
        send: Option<String>,
    },

    /// Manage scheduled tasks of a server.
    Tasks {
        server_id: String,
        #[command(subcommand)]
        action: tasks::TaskAction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warden_cli=info,warden_core=info,warden_scheduler=info,warden_servers=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = WardenConfig::load(cli.config.as_deref())?;
    debug!(base_url = %config.panel.base_url, "Config loaded");
    let client = ApiClient::from_config(&config)?;

    match cli.command {
        Command::Servers { server_id: None } => {
            for server in Servers::new(client).list().await? {
                println!(
                    "{}\t{}\t{}\t{}/{}",
                    server.server_id, server.name, server.status, server.players_online, server.max_players
                );
            }
        }
        Command::Servers {
            server_id: Some(id),
        } => {
            let server = Servers::new(client).details(&ServerId::from(id)).await?;
            println!("id:       {}", server.server_id);
            println!("name:     {}", server.name);
            println!("status:   {}", server.status);
            println!("players:  {}/{}", server.players_online, server.max_players);
            if let Some(version) = server.version {
                println!("version:  {version}");
            }
        }
        Command::Power { server_id, action } => {
            Servers::new(client)
                .power(&ServerId::from(server_id), action)
                .await?;
            println!("{action} sent");
        }
        Command::Console { server_id, send } => {
            let console = Console::new(client);
            let server_id = ServerId::from(server_id);
            match send {
                Some(command) => console.send(&server_id, &command).await?,
                None => {
                    for line in console.lines(&server_id).await? {
                        match line.timestamp {
                            Some(ts) => println!("[{ts}] {}", line.text),
                            None => println!("{}", line.text),
                        }
                    }
                }
            }
        }
        Command::Tasks { server_id, action } => {
            tasks::run(client, ServerId::from(server_id), action).await?;
        }
    }

    Ok(())
}

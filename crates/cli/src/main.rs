//! sonic - interactive CLI for managing a Sonic CDN
//!
//! Binary entry point: argument parsing, capability gating against the
//! loaded session, and dispatch to the per-command handlers.

mod banner;
mod flow;
mod handlers;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use handlers::RunContext;
use sonic_core::{Session, SessionStore, Severity};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sonic",
    version,
    disable_version_flag = true,
    about = "A CLI tool for managing a Sonic CDN"
)]
struct Cli {
    /// Print list responses as raw JSON
    #[arg(long, global = true)]
    json: bool,

    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a Sonic CDN by url
    Connect,
    /// Log into an account on the connected CDN
    Login,
    /// Log out of the current account
    Logout,
    /// List user accounts
    Users,
    /// Create a user account
    #[command(name = "users:create")]
    UsersCreate,
    /// Update the logged-in account
    #[command(name = "users:update")]
    UsersUpdate,
    /// Delete a user account
    #[command(name = "users:delete")]
    UsersDelete,
    /// List buckets
    Buckets,
    /// Create a bucket
    #[command(name = "buckets:create")]
    BucketsCreate,
    /// Delete a bucket
    #[command(name = "buckets:delete")]
    BucketsDelete,
    /// List assets
    Assets,
    /// Upload a file as a versioned asset
    #[command(name = "assets:upload")]
    AssetsUpload {
        /// Path of the file to upload
        file: String,
    },
    /// Delete an asset, version or file
    #[command(name = "assets:delete")]
    AssetsDelete,
}

/// What the current session permits
#[derive(Debug, Clone, Copy)]
struct Capabilities {
    connected: bool,
    logged_in: bool,
}

impl From<&Session> for Capabilities {
    fn from(session: &Session) -> Self {
        Self {
            connected: session.is_connected(),
            logged_in: session.is_logged_in(),
        }
    }
}

/// Gate a command against the session: `connect` is always available,
/// `login` needs a connection, everything else needs a login.
fn command_allowed(command: &Commands, caps: Capabilities) -> bool {
    match command {
        Commands::Connect => true,
        Commands::Login => caps.connected,
        _ => caps.logged_in,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = color_eyre::config::HookBuilder::default().install() {
        eprintln!("Failed to install error handler: {}", err);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if banner::should_show(&args) {
        banner::print();
    }

    let cli = Cli::parse();

    let store = SessionStore::open()?;
    let session = store.load()?;
    let caps = Capabilities::from(&session);

    let command = match cli.command {
        Some(command) => command,
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    if !command_allowed(&command, caps) {
        if !caps.connected {
            output::status(
                "You need to connect to a Sonic CDN before you can start!",
                Severity::Error,
            );
            output::status("Try: sonic connect", Severity::Plain);
        } else {
            output::status(
                "You need to log into an account before you can do that!",
                Severity::Error,
            );
            output::status("Try: sonic login", Severity::Plain);
        }
        return Ok(());
    }

    if caps.connected && !caps.logged_in && !matches!(command, Commands::Connect) {
        output::status("You are not logged in.", Severity::Warning);
    }

    let ctx = RunContext {
        json: cli.json,
        session,
        store,
    };
    let mut prompter = flow::TermPrompter::default();

    match command {
        Commands::Connect => handlers::handle_connect(&ctx, &mut prompter).await,
        Commands::Login => handlers::handle_login(&ctx, &mut prompter).await,
        Commands::Logout => handlers::handle_logout(&ctx, &mut prompter).await,
        Commands::Users => handlers::handle_users(&ctx).await,
        Commands::UsersCreate => handlers::handle_users_create(&ctx, &mut prompter).await,
        Commands::UsersUpdate => handlers::handle_users_update(&ctx, &mut prompter).await,
        Commands::UsersDelete => handlers::handle_users_delete(&ctx, &mut prompter).await,
        Commands::Buckets => handlers::handle_buckets(&ctx).await,
        Commands::BucketsCreate => handlers::handle_buckets_create(&ctx, &mut prompter).await,
        Commands::BucketsDelete => handlers::handle_buckets_delete(&ctx, &mut prompter).await,
        Commands::Assets => handlers::handle_assets(&ctx).await,
        Commands::AssetsUpload { ref file } => {
            handlers::handle_assets_upload(&ctx, &mut prompter, file).await
        }
        Commands::AssetsDelete => handlers::handle_assets_delete(&ctx, &mut prompter).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISCONNECTED: Capabilities = Capabilities {
        connected: false,
        logged_in: false,
    };
    const CONNECTED: Capabilities = Capabilities {
        connected: true,
        logged_in: false,
    };
    const LOGGED_IN: Capabilities = Capabilities {
        connected: true,
        logged_in: true,
    };

    #[test]
    fn test_connect_is_always_allowed() {
        assert!(command_allowed(&Commands::Connect, DISCONNECTED));
        assert!(command_allowed(&Commands::Connect, CONNECTED));
        assert!(command_allowed(&Commands::Connect, LOGGED_IN));
    }

    #[test]
    fn test_login_needs_a_connection() {
        assert!(!command_allowed(&Commands::Login, DISCONNECTED));
        assert!(command_allowed(&Commands::Login, CONNECTED));
    }

    #[test]
    fn test_resource_commands_need_a_login() {
        for command in [
            Commands::Logout,
            Commands::Users,
            Commands::UsersCreate,
            Commands::UsersUpdate,
            Commands::UsersDelete,
            Commands::Buckets,
            Commands::BucketsCreate,
            Commands::BucketsDelete,
            Commands::Assets,
            Commands::AssetsUpload {
                file: "app.js".to_string(),
            },
            Commands::AssetsDelete,
        ] {
            assert!(!command_allowed(&command, DISCONNECTED));
            assert!(!command_allowed(&command, CONNECTED));
            assert!(command_allowed(&command, LOGGED_IN));
        }
    }

    #[test]
    fn test_cli_parses_namespaced_subcommands() {
        let cli = Cli::try_parse_from(["sonic", "assets:upload", "app.js"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::AssetsUpload { ref file }) if file == "app.js"
        ));
    }

    #[test]
    fn test_json_flag_is_global() {
        let cli = Cli::try_parse_from(["sonic", "users", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Users)));
    }
}

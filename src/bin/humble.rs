//! Command-line client for the Humble Bundle API
//!
//! Authenticates with the `_simpleauth_sess` cookie copied from a browser
//! session and prints the requested resource as JSON on stdout. Logs go to
//! stderr.
//!
//! # Usage
//!
//! ```bash
//! humble --cookie "$COOKIE" orders
//! HUMBLE_AUTH_COOKIE="$COOKIE" humble trove --limit 40
//! humble --cookie "$COOKIE" history february_2020_choice
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use humble_client::{
    AuthCookie, HumbleApi,
    cli::{Command, init_logging, run_command},
    config::ConfigLoader,
    types::SESSION_COOKIE_NAME,
};

/// Authorized Humble Bundle API client
#[derive(Parser)]
#[command(name = "humble", author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Session cookie value as stored by the browser
    #[arg(long, env = "HUMBLE_AUTH_COOKIE", hide_env_values = true)]
    cookie: Option<String>,

    /// Name of the session cookie
    #[arg(long, default_value = SESSION_COOKIE_NAME)]
    cookie_name: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loader = ConfigLoader::new();
    let settings = match &cli.config {
        Some(path) => loader.load(Some(path.as_path())),
        None => loader.load_default(),
    }
    .context("Failed to load configuration")?;

    init_logging(
        &settings.logging.level,
        cli.verbose || settings.logging.verbose,
    );

    let mut api = HumbleApi::new(&settings)?;

    let user_id = match &cli.cookie {
        Some(value) => {
            let cookie = AuthCookie::new(&cli.cookie_name, value);
            Some(api.authenticate(&cookie).context("Invalid session cookie")?)
        }
        None => {
            tracing::warn!("No session cookie given, requests run unauthenticated");
            None
        }
    };

    let output = run_command(&api, user_id.as_deref(), &cli.command).await;
    api.close();

    println!("{}", serde_json::to_string_pretty(&output?)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use humble_client::cli::WebpackPage;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["humble", "orders"]);
        assert_eq!(cli.command, Command::Orders);
        assert_eq!(cli.cookie_name, SESSION_COOKIE_NAME);
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_trove_arguments() {
        let cli = Cli::parse_from(["humble", "-v", "trove", "--from-chunk", "3", "--limit", "5"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Command::Trove {
                from_chunk: 3,
                limit: Some(5)
            }
        );
    }

    #[test]
    fn test_cli_webpack_page() {
        let cli = Cli::parse_from(["humble", "webpack", "choice-marketing"]);
        assert_eq!(
            cli.command,
            Command::Webpack {
                page: WebpackPage::ChoiceMarketing
            }
        );
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["humble"]).is_err());
    }
}

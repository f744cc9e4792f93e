mod commands;
mod prompt;

use std::fs::File;
use std::net::SocketAddr;
use std::process::ExitCode;

use authform_lib::{AuthConfig, LoadingScope};
use clap::{Args, Parser, Subcommand};
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "authform")]
#[command(version)]
#[command(about = "Sign-in, sign-up, and registration forms in the terminal")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level written to authform.log
    #[arg(long, global = true, default_value = "debug")]
    log_level: LevelFilter,
}

/// Options shared by the form commands.
#[derive(Args, Clone)]
struct FormArgs {
    /// Pre-fill a field (repeatable), e.g. --set email=test@example.com
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    values: Vec<(String, String)>,

    /// Show password fields in plain text
    #[arg(long)]
    show_password: bool,
}

/// Options for commands that submit to a backend.
#[derive(Args, Clone)]
struct ActionArgs {
    /// Base URL of the auth backend
    #[arg(long, env = "AUTHFORM_BASE_URL")]
    base_url: Option<String>,

    /// Use a simulated backend instead of HTTP
    #[arg(long)]
    simulate: bool,

    /// Where to navigate after success
    #[arg(long)]
    redirect: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    SignIn {
        #[command(flatten)]
        action: ActionArgs,

        #[command(flatten)]
        form: FormArgs,
    },

    /// Create an account
    SignUp {
        #[command(flatten)]
        action: ActionArgs,

        #[command(flatten)]
        form: FormArgs,
    },

    /// Fill in the registration demo form (validation only)
    Register {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Run the stub auth server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8787")]
        addr: SocketAddr,

        /// Seed an account (repeatable), e.g. --account test@example.com=password123
        #[arg(long = "account", value_name = "EMAIL=PASSWORD", value_parser = parse_assignment)]
        accounts: Vec<(String, String)>,
    },

    /// Continue with a social provider (simulated)
    Social {
        /// Provider id: google, github, facebook, or any other id
        provider: String,

        /// Make the provider fail
        #[arg(long)]
        fail: bool,

        /// Busy flag scope: shared or per-provider
        #[arg(long)]
        scope: Option<LoadingScope>,

        /// Report failures as sign-up failures
        #[arg(long)]
        sign_up: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

fn init_logging(level: LevelFilter) {
    match File::create("authform.log") {
        Ok(log_file) => {
            if let Err(e) = WriteLogger::init(level, Config::default(), log_file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file: {}", e),
    }
}

fn load_config() -> Result<AuthConfig, String> {
    let _ = dotenvy::dotenv();
    AuthConfig::from_env().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::SignIn { action, form } => commands::sign_in(config, action, form).await,
        Commands::SignUp { action, form } => commands::sign_up(config, action, form).await,
        Commands::Register { form } => commands::register(form).await,
        Commands::Serve { addr, accounts } => commands::serve(addr, accounts).await,
        Commands::Social {
            provider,
            fail,
            scope,
            sign_up,
        } => commands::social(config, &provider, fail, scope, sign_up).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("email=a=b@example.com"),
            Ok(("email".to_string(), "a=b@example.com".to_string()))
        );
        assert!(parse_assignment("=value").is_err());
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn test_parse_social() {
        let cli = Cli::try_parse_from(["authform", "social", "github", "--scope", "per-provider"]).unwrap();
        match cli.command {
            Commands::Social { provider, scope, .. } => {
                assert_eq!(provider, "github");
                assert_eq!(scope, Some(LoadingScope::PerProvider));
            }
            _ => panic!("expected social"),
        }
    }
}

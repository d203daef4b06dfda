use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::{Builder, Target};
use log::LevelFilter;
use serde::Serialize;
use sotw_client::App;
use sotw_config::ConfigLoader;
use sotw_model::LoginCredentials;

#[derive(Debug, Parser)]
#[command(name = "sotw-client", version, about = "Song of the Week client")]
struct Cli {
    /// TOML config file (overrides SOTW_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Env file layered under the process environment
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Restore the session, navigate to a path and print the resulting state
    Visit { path: String },
    /// Sign in (password from SOTW_PASSWORD) and continue to a path
    Login {
        email: String,
        #[arg(long, default_value = "/")]
        then: String,
    },
    /// Print the route table
    Routes,
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("sotw_client", LevelFilter::Debug)
        .filter_module("sotw_config", LevelFilter::Debug)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();

    let mut loader = ConfigLoader::new().with_env_file(&cli.env_file);
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load().context("failed to load configuration")?;

    if let Command::Routes = cli.command {
        for route in sotw_client::navigation::RouteTable::standard(&config.routes).routes() {
            let meta = route.meta();
            println!(
                "{:<32} {:<16} auth={} guest={} member_of={}",
                route.pattern(),
                route.name(),
                meta.requires_auth,
                meta.guest,
                meta.member_of.unwrap_or("-")
            );
        }
        return Ok(());
    }

    let app = App::new(config).context("failed to build client")?;

    match cli.command {
        Command::Visit { path } => {
            app.start().await;
            let visit = app.visit(&path).await?;
            print_json(&visit)?;
        }
        Command::Login { email, then } => {
            let password =
                std::env::var("SOTW_PASSWORD").context("SOTW_PASSWORD must be set to log in")?;
            // Go through the guard first so a protected target is remembered.
            app.visit(&then).await?;
            let visit = app
                .login(&LoginCredentials::new(email, password))
                .await?;
            print_json(&visit)?;
        }
        Command::Routes => {}
    }

    print_json(&app.snapshot())
}

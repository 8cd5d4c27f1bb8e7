use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::Text;
use std::io;
use tracing::{debug, info};

use weather_query_core::{Config, HttpBackend, config::DEFAULT_BACKEND_URL};

use crate::session::Session;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-query", version, about = "Ask an inference backend about the weather")]
pub struct Cli {
    /// Backend chat endpoint; overrides the configured one.
    #[arg(long, global = true, env = "WEATHER_QUERY_BACKEND")]
    pub backend: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a single query and print the answer.
    Ask {
        /// Free-text question, e.g. "How is the weather in Pune?".
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Start an interactive session.
    Chat,

    /// Set the backend endpoint and save it to the config file.
    Configure {
        /// Endpoint URL; prompted for when absent.
        #[arg(long)]
        url: Option<String>,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Ask { ref text } => {
                let backend = self.backend()?;
                let mut session = Session::new(&backend);
                session.turn(&text.join(" "), &mut io::stdout().lock()).await?;
            }
            Command::Chat => {
                let backend = self.backend()?;
                println!("Backend: {}", backend.endpoint());
                let mut session = Session::new(&backend);
                session.chat(&mut io::stdout().lock()).await?;
            }
            Command::Configure { ref url } => configure(url.as_deref())?,
            Command::ConfigPath => println!("{}", Config::config_file_path()?.display()),
        }

        Ok(())
    }

    fn backend(&self) -> Result<HttpBackend> {
        let mut config = Config::load()?;
        if let Some(url) = &self.backend {
            config.set_backend_url(url)?;
        }

        let backend = HttpBackend::from_config(&config)?;
        debug!(endpoint = %backend.endpoint(), "using backend");
        Ok(backend)
    }
}

fn configure(url: Option<&str>) -> Result<()> {
    let mut config = Config::load()?;

    let url = match url {
        Some(url) => url.to_string(),
        None => {
            let current = config
                .backend_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
            Text::new("Backend chat endpoint:")
                .with_default(&current)
                .prompt()
                .context("Failed to read backend URL")?
        }
    };

    config.set_backend_url(&url)?;
    config.save()?;

    info!(path = %Config::config_file_path()?.display(), "configuration saved");
    println!("Backend set to {}", config.backend_url()?);
    Ok(())
}

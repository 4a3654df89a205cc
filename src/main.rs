//! Verdant - plan a garden from the terminal.
//!
//! Browses a plant catalog served by a garden-planner backend, lets you
//! pick plants and generates a personalized plan for your location.

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;
use verdant::api::ApiClient;
use verdant::app;
use verdant::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "verdant",
    about = "Terminal garden planner",
    long_about = "V E R D A N T\n\n\
                  Pick plants from the catalog, search or grow new entries\n\
                  with AI, and generate a garden plan for your zip code.",
    version
)]
struct Args {
    /// Backend base URL (overrides the configured default)
    #[arg(long)]
    server: Option<String>,

    /// Zip code to plan for (remembered for next time)
    #[arg(long)]
    zip: Option<String>,

    /// Directory for downloaded plan documents (defaults to the current directory)
    #[arg(long)]
    output_dir: Option<std::path::PathBuf>,

    /// Print the config file location and exit
    #[arg(long)]
    config_path: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.config_path {
        println!("{}", Config::config_location());
        return Ok(());
    }

    let mut config = Config::load();
    if let Some(server) = args.server {
        config.server_url = server;
    }
    if let Some(zip) = args.zip {
        config.zip_code = Some(zip);
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = Some(dir);
    }

    let base = Url::parse(&config.server_url)
        .with_context(|| format!("Invalid server URL '{}'", config.server_url))?;
    let api = ApiClient::new(base);

    app::run_tui(api, config).await
}

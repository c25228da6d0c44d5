//! CLI entry point for geeklog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "geeklog")]
#[command(author = "Enjun Zhou")]
#[command(version = "0.1.0")]
#[command(about = "A personal blog engine with a validated content store", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Generate and start a local preview server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the public folder
    Clean,

    /// List site content (posts, categories, tags)
    List {
        /// Type of content to list
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Search posts by term, category and tag
    Search {
        /// Term matched against titles, descriptions and tag labels
        #[arg(default_value = "")]
        term: String,

        /// Restrict to a category id ("all" means no restriction)
        #[arg(short, long)]
        category: Option<String>,

        /// Restrict to an exact tag label ("all" means no restriction)
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "geeklog=debug,info"
    } else {
        "geeklog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Generate => {
            let site = geeklog::Site::load(&base_dir)?;
            tracing::info!("Generating static files...");
            geeklog::commands::generate::run(&site)?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip, open } => {
            let site = geeklog::Site::load(&base_dir)?;

            tracing::info!("Generating static files...");
            geeklog::commands::generate::run(&site)?;

            let port = port.unwrap_or(site.config.port);
            tracing::info!("Starting server at http://{}:{}", ip, port);
            geeklog::server::start(&site, &ip, port, open).await?;
        }

        Commands::Clean => {
            let config = geeklog::config::SiteConfig::load_or_default(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            geeklog::commands::clean::run(&base_dir, &config)?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = geeklog::Site::load(&base_dir)?;
            geeklog::commands::list::run(&site, &r#type)?;
        }

        Commands::Search {
            term,
            category,
            tag,
        } => {
            let site = geeklog::Site::load(&base_dir)?;
            geeklog::commands::search::run(&site, &term, category.as_deref(), tag.as_deref())?;
        }

        Commands::Version => {
            println!("geeklog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

//! CLI entry point for blogd

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blogd")]
#[command(version)]
#[command(about = "Post metadata pipeline and server for a markdown blog", long_about = None)]
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
    /// Write post metadata, feed, sitemap and redirects to the public directory
    #[command(alias = "b")]
    Build {
        /// Rebuild when posts or the config change
        #[arg(short, long)]
        watch: bool,
    },

    /// Start the HTTP server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Recompute post metadata on every request
        #[arg(long)]
        dev: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Publication date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// List posts, newest first
    List,

    /// Remove the public directory
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogd=debug,info"
    } else {
        "blogd=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Build { watch } => {
            let blog = blogd::Blog::new(&base_dir)?;
            tracing::info!("Building from {:?}", blog.posts_dir);

            blogd::commands::build::run(&blog).await?;
            println!("Built successfully!");

            if watch {
                blogd::commands::build::watch(&blog).await?;
            }
        }

        Commands::Server { port, ip, dev } => {
            let blog = blogd::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            blogd::server::start(&blog, &ip, port, dev).await?;
        }

        Commands::New { title, date } => {
            let blog = blogd::Blog::new(&base_dir)?;
            let path = blogd::commands::new::create_post(&blog, &title, date.as_deref())?;
            println!("Created: {}", path.display());
        }

        Commands::List => {
            let blog = blogd::Blog::new(&base_dir)?;
            blogd::commands::list::run(&blog).await?;
        }

        Commands::Clean => {
            let blog = blogd::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blogd::commands::clean::run(&blog)?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("blogd version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

//! folio CLI tool
//!
//! Operator-side companion for a folio-core site.
//!
//! ## Commands
//!
//! - `hash <password>`: derive the encoded admin credential to bake into the site config
//! - `fetch <domain>`: load one domain's content from a deployed site and print it (requires
//!   the `http` feature)
//! - `export <file>`: re-serialize a local content file through the export bridge, normalizing
//!   its formatting

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use folio_core::{
    auth::Credential,
    document::Domain,
    export::{export_document, DownloadDirTarget},
    FolioError,
};

#[cfg(feature = "http")]
use folio_core::{
    loader::{ContentLoader, HttpContentSource},
    paths::PathResolver,
};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Content tooling for a folio-core site", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the encoded admin credential for a password
    Hash {
        /// The password to derive from
        password: String,

        /// PBKDF2 iteration count override
        #[arg(long)]
        iterations: Option<u32>,
    },

    /// Fetch and print one domain's content from a deployed site
    #[cfg(feature = "http")]
    Fetch {
        /// Content domain (home, about, portfolio, blog, contact, footer, global_settings)
        domain: String,

        /// Site origin, e.g. https://example.github.io
        #[arg(long)]
        origin: String,

        /// Deployment base prefix, e.g. /MadhuPortfolio/
        #[arg(long, default_value = "/")]
        base: String,
    },

    /// Re-export a local content file with normalized formatting
    Export {
        /// Path to the content JSON file
        file: PathBuf,

        /// Content domain the file belongs to
        #[arg(long)]
        domain: String,

        /// Directory the export is written into
        #[arg(long, default_value = "downloads")]
        out: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), FolioError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Hash {
            password,
            iterations,
        } => {
            let credential = match iterations {
                Some(n) => Credential::generate_with_iterations(&password, n)?,
                None => Credential::generate(&password)?,
            };
            println!("{credential}");
        }
        #[cfg(feature = "http")]
        Commands::Fetch {
            domain,
            origin,
            base,
        } => {
            let domain = Domain::from_str(&domain)?;
            let origin = origin
                .parse::<url::Url>()
                .map_err(|err| FolioError::Config(format!("invalid origin: {err}")))?;
            let loader = ContentLoader::new(
                std::sync::Arc::new(HttpContentSource::new(origin)),
                PathResolver::new(base),
            );
            let doc = loader.try_load(domain).await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Commands::Export { file, domain, out } => {
            let domain = Domain::from_str(&domain)?;
            let text = std::fs::read_to_string(&file)?;
            let doc: serde_json::Value = serde_json::from_str(&text)?;
            let target = DownloadDirTarget::new(out.clone());
            let file_name = export_document(&doc, domain, &target)?;
            println!("wrote {}", out.join(file_name).display());
        }
    }
    Ok(())
}

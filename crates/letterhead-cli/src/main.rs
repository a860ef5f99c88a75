//! letterhead - uploads converted documents to the remote word-processing
//! backend and imposes the corporate layout on each one.

mod render;

use anyhow::{Context, Result};
use clap::Parser;
use letterhead_backend::HttpDocumentService;
use letterhead_core::RetryPolicy;
use letterhead_pipeline::{
    CancelToken, DeployConfig, Deployer, LayoutConfig, RenderedDocument,
};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "letterhead",
    version,
    about = "Deploys corporate-styled documents to the remote backend"
)]
struct Args {
    /// Directory containing the markdown sources
    #[arg(short, long, default_value = "./artifacts")]
    dir: PathBuf,

    /// Remote staging folder the documents are created in
    #[arg(long, default_value = "Document_Staging")]
    folder: String,

    /// Public URI of the logo asset inserted into each header
    #[arg(long)]
    logo_url: String,

    /// Version string stamped into each footer
    #[arg(long, default_value = "1.0")]
    doc_version: String,

    /// Extra CSS file layered under the corporate table styling
    #[arg(long)]
    style: Option<PathBuf>,

    /// Skip the logo branding step
    #[arg(long)]
    no_branding: bool,

    /// Skip the table-of-contents insertion
    #[arg(long)]
    no_toc: bool,

    /// Retry attempts for each remote batch
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let service = HttpDocumentService::from_env()?;

    let documents = load_documents(&args)?;
    if documents.is_empty() {
        anyhow::bail!("no markdown files found under {}", args.dir.display());
    }

    let cancel = CancelToken::new();
    {
        // Ctrl-C requests cancellation; the run stops between batch calls.
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, stopping after the current call");
                cancel.cancel();
            }
        });
    }

    let retry = RetryPolicy {
        max_attempts: args.max_attempts,
        ..RetryPolicy::default()
    }
    .validated()?;

    let config = DeployConfig {
        folder_name: args.folder.clone(),
        toc: !args.no_toc,
        repeat_table_headers: true,
        layout: LayoutConfig {
            logo_uri: args.logo_url.clone(),
            version_label: args.doc_version.clone(),
            branding: !args.no_branding,
            retry,
            ..LayoutConfig::default()
        },
    };

    let deployer = Deployer::new(&service, &config, cancel);
    let summary = deployer.run(&documents).await?;

    for outcome in &summary.outcomes {
        if let Err(reason) = &outcome.result {
            error!("'{}': {reason}", outcome.title);
        }
    }
    if summary.failed() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Enumerates `*.md` under the source directory and renders each to HTML.
fn load_documents(args: &Args) -> Result<Vec<RenderedDocument>> {
    let extra_css = match &args.style {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read stylesheet {}", path.display()))?,
        None => String::new(),
    };

    let pattern = args.dir.join("*.md");
    let mut documents = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy()).context("invalid source directory")? {
        let path = entry.context("failed to read directory entry")?;
        let markdown = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());
        documents.push(RenderedDocument {
            title,
            html: render::render_document(&markdown, &extra_css),
        });
    }
    // Glob order is platform dependent; deploy in a stable order.
    documents.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(documents)
}

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use video_washer::Washer;
use video_washer::config::WasherConfig;
use video_washer::models::SelectedFile;
use video_washer::services::gate::GateOutcome;
use video_washer::services::transport::HttpTransport;
use video_washer::view::terminal::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video or image to wash
    file: PathBuf,

    /// Washer service URL (overrides WASHER_BASE_URL)
    #[arg(short, long)]
    server: Option<String>,

    /// Access code for the metadata panels
    #[arg(short, long)]
    code: Option<String>,

    /// Directory the washed file is saved into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Upload and show metadata only
    #[arg(long)]
    skip_wash: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment & Logging Setup
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video_washer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Configuration
    let mut config = WasherConfig::from_env();
    if let Some(server) = args.server {
        config = config.with_base_url(server);
    }
    info!(
        "🚀 Video Washer → {} (max {}MB, metadata lock {})",
        config.base_url,
        config.max_file_size / 1024 / 1024,
        if config.gate.is_locking() { "on" } else { "off" }
    );

    let transport = Arc::new(HttpTransport::new(&config.base_url)?);
    let mut washer = Washer::new(config, transport, Box::new(TerminalRenderer::new()));

    // 3. Upload
    let file = SelectedFile::from_path(&args.file).await?;
    washer.browse_files(vec![file]).await?;

    // 4. Metadata gate
    if !washer.metadata_unlocked() {
        match args.code.as_deref() {
            Some(code) => {
                if washer.submit_access_code(code) != GateOutcome::Unlocked {
                    info!("Metadata stays hidden");
                }
            }
            None => info!("Pass --code to reveal metadata"),
        }
    }

    if args.skip_wash {
        return Ok(());
    }

    // 5. Wash & Download
    washer.wash().await?;
    if let Some(url) = washer.download_url() {
        info!("🔗 {}", url);
    }
    let saved = washer.download_to(&args.output).await?;
    info!("🏁 Done: {}", saved.display());

    Ok(())
}

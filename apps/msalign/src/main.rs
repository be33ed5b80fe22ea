mod cli;
mod config;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use msalign_align::{AlignRequest, Aligner, run_alignment_task};
use msalign_proxy::TransferProxy;

use cli::{Cli, Command};
use config::Settings;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_env(|key| std::env::var(key).ok())?;
    settings.apply_flags(cli.endpoint, cli.chunk_size);
    tracing::debug!(
        endpoint = %settings.endpoint,
        chunk_size = settings.chunk_size_bytes,
        execution_id = ?settings.execution_id,
        "settings resolved"
    );

    let proxy = TransferProxy::new(settings.proxy_config())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    runtime.block_on(run(&proxy, cli.command))
}

async fn run(proxy: &TransferProxy, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Exists { locator } => {
            let exists = proxy.exists(&locator).await?;
            println!("{exists}");
        }
        Command::Download { locator, path } => {
            proxy.download(&locator, &path).await?;
        }
        Command::DownloadDir { locator, dir } => {
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("failed to create {}", dir.display()))?;
            proxy.download_directory(&locator, &dir).await?;
        }
        Command::Upload { path, locator } => {
            proxy.upload(&path, &locator).await?;
        }
        Command::UploadDir { dir, locator } => {
            proxy.upload_directory(&dir, &locator).await?;
        }
        Command::Align {
            input,
            mode,
            output,
            mafft,
            work_dir,
        } => {
            let aligner = match mafft {
                Some(program) => Aligner::with_program(program),
                None => Aligner::new(),
            };
            let mut request = AlignRequest::new(input, work_dir).with_mode(mode);
            request.output_name = output;

            let out = run_alignment_task(proxy, &aligner, &request).await?;
            println!("{}", out.locator);
        }
    }
    Ok(())
}

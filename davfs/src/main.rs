mod config;
mod mounts;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use futures::TryStreamExt;
use tokio::io::AsyncWriteExt;

use config::*;
use mounts::MountTable;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    #[clap(short, long, env = "DAVFS_CONFIG", default_value = "davfs.toml")]
    /// Path to the mount table
    config_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the immediate children of a directory
    Ls { path: String },
    /// Print a file to the standard output
    Cat { path: String },
    /// Upload a local file
    Put { local: PathBuf, path: String },
    /// Delete a file or a directory
    Rm { path: String },
    /// Copy on the server side
    Cp { src: String, dest: String },
    /// Move or rename on the server side
    Mv { src: String, dest: String },
    /// Create a directory
    Mkdir { path: String },
    /// Exit with 0 when the path can be reached, 1 otherwise
    Exists { path: String },
}

fn tracer() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "davfs=info,davfs_adapter=info,davfs_xml=info")
    }

    tracer();

    let args = Args::parse();
    let config = read_config(args.config_file.clone())
        .with_context(|| format!("read mount table {}", args.config_file.display()))?;
    let mounts = MountTable::new(&config).context("build mount table")?;

    if let Err(e) = run(&mounts, args.command).await {
        tracing::error!(err=?e, "command failed");
        return Err(e);
    }
    Ok(())
}

async fn run(mounts: &MountTable, command: Command) -> Result<()> {
    match command {
        Command::Ls { path } => {
            let entries = mounts.get(&path)?.readdir(&path).await.context("readdir")?;
            for entry in entries {
                println!(
                    "{} {:>12} {:<28} {}",
                    if entry.is_directory { "d" } else { "-" },
                    entry.size,
                    entry.mime.as_deref().unwrap_or("-"),
                    entry.filename
                );
            }
        }
        Command::Cat { path } => {
            let mut stream = mounts.get(&path)?.readfile(&path).await.context("readfile")?;
            let mut stdout = tokio::io::stdout();
            while let Some(chunk) = stream.try_next().await.context("read file content")? {
                stdout.write_all(&chunk).await?;
            }
            stdout.flush().await?;
        }
        Command::Put { local, path } => {
            let data = tokio::fs::read(&local)
                .await
                .with_context(|| format!("read local file {}", local.display()))?;
            let size = data.len();
            mounts
                .get(&path)?
                .writefile(&path, Bytes::from(data))
                .await
                .context("writefile")?;
            tracing::info!(path=%path, size=size, "uploaded");
        }
        Command::Rm { path } => {
            mounts.get(&path)?.unlink(&path).await.context("unlink")?;
            tracing::info!(path=%path, "deleted");
        }
        Command::Cp { src, dest } => {
            mounts.get_pair(&src, &dest)?.copy(&src, &dest).await.context("copy")?;
            tracing::info!(src=%src, dest=%dest, "copied");
        }
        Command::Mv { src, dest } => {
            mounts.get_pair(&src, &dest)?.rename(&src, &dest).await.context("rename")?;
            tracing::info!(src=%src, dest=%dest, "moved");
        }
        Command::Mkdir { path } => {
            mounts.get(&path)?.mkdir(&path).await.context("mkdir")?;
            tracing::info!(path=%path, "directory created");
        }
        Command::Exists { path } => match mounts.get(&path)?.exists(&path).await {
            Ok(_) => println!("true"),
            Err(e) => {
                tracing::debug!(path=%path, err=%e, "existence check rejected");
                println!("false");
                std::process::exit(1);
            }
        },
    }
    Ok(())
}

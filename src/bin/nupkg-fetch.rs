//! nupkg-fetch - download a NuGet package and all of its dependencies
//!
//! Usage:
//!   nupkg-fetch <TARGET_DIR> <PACKAGE> [VERSION]
//!
//! Exit codes: 0 on success, 1 on invalid arguments or any download failure.

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use nupkg_fetch::{
    Config, ConsoleObserver, DownloadObserver, DownloadReport, HttpFetcher, NullObserver,
    NuspecReader, Overrides, PackageId, RecursiveDownloader, config, output,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const AFTER_HELP: &str = "\
Examples:
  Download the latest Microsoft.CodeAnalysis and its dependencies to ./packages:
    nupkg-fetch ./packages Microsoft.CodeAnalysis

  Download a specific version:
    nupkg-fetch ./packages Microsoft.CodeAnalysis 2.1.0";

#[derive(Parser)]
#[command(name = "nupkg-fetch")]
#[command(about = "Download a NuGet package and every package it depends on")]
#[command(version)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Existing directory to save packages to
    target_dir: PathBuf,

    /// Package id, e.g. Newtonsoft.Json
    package: String,

    /// Package version (latest if omitted)
    #[arg(value_name = "VERSION")]
    package_version: Option<String>,

    /// Registry download endpoint
    #[arg(long, env = config::REGISTRY_ENV)]
    registry: Option<String>,

    /// HTTP timeout in seconds (5-300)
    #[arg(long, env = config::TIMEOUT_ENV)]
    timeout: Option<u64>,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Also print where each package is written
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = PackageId::new(cli.package.as_str(), cli.package_version.as_deref())
        .context("Invalid package identifier")?;

    let config = Config::load(Overrides {
        registry: cli.registry,
        timeout_secs: cli.timeout,
    })
    .context("Failed to load configuration")?;

    let fetcher = HttpFetcher::from_config(&config).show_progress(!cli.quiet);

    let report = if cli.quiet {
        download(fetcher, NullObserver, &root, &cli.target_dir)?
    } else {
        output::info(&format!("Registry: {}", config.registry));
        if config.registry.to_lowercase().starts_with("http://") {
            output::warning("registry uses plain HTTP; packages are not verified");
        }
        download(
            fetcher,
            ConsoleObserver::new().verbose(cli.verbose),
            &root,
            &cli.target_dir,
        )?
    };

    if !cli.quiet {
        print_summary(&root, &report, &cli.target_dir, cli.verbose);
    }
    Ok(())
}

fn download<O: DownloadObserver>(
    fetcher: HttpFetcher,
    observer: O,
    root: &PackageId,
    target_dir: &Path,
) -> Result<DownloadReport> {
    let mut downloader = RecursiveDownloader::new(fetcher, NuspecReader::new(), observer);
    downloader
        .download_all(root, target_dir)
        .with_context(|| format!("Failed to download {} into {}", root, target_dir.display()))
}

fn print_summary(root: &PackageId, report: &DownloadReport, target_dir: &Path, verbose: bool) {
    let count = report.downloaded.len();
    output::success(&format!(
        "{} and its dependencies: {} package{} ({} bytes) saved to {}",
        root,
        count,
        if count == 1 { "" } else { "s" },
        report.bytes,
        target_dir.display()
    ));
    if verbose {
        for path in report.paths() {
            output::sub_action(&path.display().to_string());
        }
    }
    if report.skipped > 0 {
        output::detail(&format!(
            "{} repeated reference{} skipped",
            report.skipped,
            if report.skipped == 1 { "" } else { "s" }
        ));
    }
}

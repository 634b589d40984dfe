//! CLI entry point. Wires the library's components into the flag surface:
//! `--disable-webserver`, `--enable-cert-validation`, `--start-current`,
//! `--one-pass`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use ctlog_crawler::config::CrawlConfig;
use ctlog_crawler::scheduler;

#[derive(Parser, Debug)]
#[command(name = "ctlog-crawler", about = "Certificate Transparency log crawler")]
struct Cli {
    /// Directory the timestamped hostname feed files (and the static file
    /// server, unless disabled) are written under.
    #[arg(long, default_value = "./static")]
    output_dir: PathBuf,

    /// Skip starting the static file server over `--output-dir`.
    #[arg(long)]
    disable_webserver: bool,

    /// Enforce normal TLS certificate validation against CT log API
    /// endpoints. Off by default: some log operators present certificates
    /// chained outside the general trust fabric, so validation for this
    /// channel is skipped unless this flag is passed.
    #[arg(long)]
    enable_cert_validation: bool,

    /// On the first cycle, baseline each endpoint's cursor at its current
    /// tree size instead of crawling from zero.
    #[arg(long)]
    start_current: bool,

    /// Run exactly one crawl cycle and exit instead of looping forever.
    #[arg(long)]
    one_pass: bool,

    /// Seconds to wait between the end of one cycle and the start of the
    /// next (ignored in `--one-pass` mode).
    #[arg(long, default_value_t = 300)]
    cycle_delay_secs: u64,
}

fn raise_fd_limit() {
    const DESIRED_NOFILE: u64 = 2048;
    match rlimit::utils::increase_nofile_limit(DESIRED_NOFILE) {
        Ok(n) => debug!("raised open-file limit to {}", n),
        Err(e) => warn!("could not raise open-file limit: {}", e),
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    raise_fd_limit();

    let config = CrawlConfig {
        output_dir: cli.output_dir.clone(),
        disable_api_cert_validation: !cli.enable_cert_validation,
        start_current: cli.start_current,
        one_pass: cli.one_pass,
        disable_webserver: cli.disable_webserver,
        cycle_delay: Duration::from_secs(cli.cycle_delay_secs),
    };

    if config.disable_webserver {
        debug!("static file server disabled");
    } else {
        // Serving `output_dir` over HTTP is a separate concern from
        // acquiring and writing the hostname feed; this binary doesn't
        // bundle a file server.
        info!(
            "static file server over {} is not part of this crawler's core; run a file server separately",
            config.output_dir.display()
        );
    }

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received interrupt, shutting down");
            cancel_for_signal.cancel();
        }
    });

    match scheduler::run(config, cancel).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            log::error!("fatal startup error: {}", e);
            std::process::exit(1);
        }
    }
}

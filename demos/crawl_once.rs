//! Runs a single crawl cycle against the real public CT log directory and
//! exits. Equivalent to `ctlog-crawler --one-pass`, shown here as a library
//! call for anyone embedding the crawler instead of running the binary.

use std::time::Duration;

use ctlog_crawler::config::CrawlConfig;
use ctlog_crawler::scheduler;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = CrawlConfig {
        output_dir: "./static".into(),
        disable_api_cert_validation: true,
        start_current: true,
        one_pass: true,
        disable_webserver: true,
        cycle_delay: Duration::from_secs(300),
    };

    if let Err(e) = scheduler::run(config, CancellationToken::new()).await {
        eprintln!("crawl failed: {}", e);
        std::process::exit(1);
    }
}

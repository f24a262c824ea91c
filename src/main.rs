// Timezone label localizer, (c) 2022 Georg Brandl.
// Licensed under the GNU AGPL, version 3 or later.

//! Main entry point for the application.

pub mod config;
pub mod logger;
pub mod patch;
pub mod roundtrip;
pub mod scan;
pub mod translate;
pub mod util;

use std::path::{Path, PathBuf};
use anyhow::Context;
use clap::Parser;

#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    /// The resource directory containing the values* directories.
    /// Defaults to the current directory.
    resdir: Option<String>,
    /// A JSON file with settings.
    #[clap(long)]
    config: Option<PathBuf>,
    /// URL of the translation page.
    #[clap(long)]
    endpoint: Option<String>,
    /// Proxy to use for HTTP requests, e.g. socks5://localhost:1080
    #[clap(long)]
    proxy: Option<String>,
    /// Patch files even if they already contain the new entry.
    #[clap(long)]
    force: bool,
    /// Enable debug output.
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    log::set_logger(&logger::Logger).expect("failed to set logger");
    log::set_max_level(log::LevelFilter::Info);
    if let Err(e) = main_inner() {
        log::error!("exiting on error: {:#}", e);
        std::process::exit(1);
    }
}

fn main_inner() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => config::Settings::from_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => config::Settings::default(),
    };
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
    }
    if let Some(proxy) = args.proxy {
        settings.proxy = Some(proxy);
    }
    if args.verbose {
        settings.log_level = "debug".into();
    }
    log::set_max_level(settings.log_filter());

    log::info!("tzlabel {} starting up...", clap::crate_version!());

    let root = Path::new(args.resdir.as_deref().unwrap_or("."));
    let translator = translate::WebTranslator::new(&settings)?;
    let summary = scan::Runner::new(&settings, &translator, args.force).run(root)?;

    log::info!("{} directories, {} patched, {} already done, {} without {}",
               summary.dirs, summary.patched, summary.skipped, summary.missing,
               settings.file_name);
    if !summary.untranslated.is_empty() {
        log::warn!("used {:?} for: {}", settings.city, summary.untranslated.join(", "));
    }
    Ok(())
}

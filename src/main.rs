use anyhow::{Context, Result};
use asset_cache::AssetCache;
use asset_cache::cli::Cli;
use clap::Parser;

fn main() {
  let cli = Cli::parse();

  let default_filter = if cli.verbose {
    "asset_cache=debug"
  } else {
    "asset_cache=info"
  };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
    .init();

  if let Err(err) = run(&cli) {
    eprintln!("Error: {err:#}");
    std::process::exit(1);
  }
}

fn run(cli: &Cli) -> Result<()> {
  let config = cli.to_config().context("failed to load configuration")?;
  log::debug!("configuration: {config:?}");

  let cache = AssetCache::new(config).context("failed to create cache directory")?;
  let report = cache
    .process_xml(&cli.xml_file)
    .with_context(|| format!("failed to cache assets for {}", cli.xml_file.display()))?;

  for collision in report.mapping.collisions() {
    log::warn!("collision: {collision}");
  }
  log::info!(
    "cached {} of {} asset(s); transformed XML available at {}",
    report.installed_count(),
    report.mapping.len(),
    report.xml_path.display()
  );
  Ok(())
}

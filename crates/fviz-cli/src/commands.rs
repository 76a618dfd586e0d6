use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fviz_ingest::IngestOptions;
use fviz_model::ViewerMetadata;
use fviz_persistence::Cache;
use tracing::{debug, info, info_span};

use fviz_cli::pipeline::{CacheTarget, LoadOutcome, run_load};
use fviz_cli::settings::Settings;

use crate::cli::{ConfigArgs, LoadArgs, ShowArgs};
use crate::summary::print_summary;

pub fn run_load_command(args: &LoadArgs, settings: &Settings) -> Result<()> {
    let mut inputs = args.inputs();
    inputs.slicetime_ref = inputs.slicetime_ref.or(settings.ingest.slicetime_ref);

    let mut options = IngestOptions::default();
    if let Some(limit) = settings.ingest.max_table_file_size {
        options.max_table_file_size = limit;
    }

    let target = if args.no_cache {
        None
    } else {
        Some(CacheTarget {
            cache: resolve_cache(args.cache_dir.as_ref(), settings),
            key: args.session_key.clone(),
        })
    };

    let LoadOutcome { metadata, cached } = run_load(&inputs, options, target.as_ref())?;
    if args.json {
        print_json(&metadata)?;
    } else {
        print_summary(
            &metadata,
            cached.as_ref().map(|(key, path)| (key.as_str(), path.as_path())),
        );
    }
    Ok(())
}

pub fn run_show_command(args: &ShowArgs, settings: &Settings) -> Result<()> {
    let span = info_span!("show", key = %args.key);
    let _guard = span.enter();
    let cache = resolve_cache(args.cache_dir.as_ref(), settings);
    let snapshot = cache.load_snapshot(&args.key).map_err(|error| {
        let mut message = error.user_message();
        if let Some(hint) = error.suggestion() {
            message.push_str("\n  hint: ");
            message.push_str(&hint);
        }
        anyhow::Error::new(error).context(message)
    })?;
    debug!(saved_at = %snapshot.saved_at, "snapshot loaded");

    if args.json {
        print_json(&snapshot.metadata)?;
    } else {
        println!("Saved: {}", snapshot.saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
        let path = cache.path_for(&args.key)?;
        print_summary(&snapshot.metadata, Some((&args.key, path.as_path())));
    }
    Ok(())
}

pub fn run_config_command(
    args: &ConfigArgs,
    path: Option<&Path>,
    settings: &Settings,
) -> Result<()> {
    let Some(path) = path else {
        bail!("no platform config folder is known; pass --config PATH");
    };
    println!("Settings file: {}", path.display());
    if args.init {
        if settings.init_at(path)? {
            info!(path = %path.display(), "settings file written");
            println!("Wrote the settings below.");
        } else {
            println!("File already exists; left unchanged.");
        }
    }
    println!();
    print!("{}", settings.to_toml()?);
    Ok(())
}

/// Cache directory precedence: flag, settings file, platform default.
fn resolve_cache(flag: Option<&PathBuf>, settings: &Settings) -> Cache {
    match flag.or(settings.cache.dir.as_ref()) {
        Some(dir) => Cache::new(dir.clone()),
        None => Cache::default_location(),
    }
}

fn print_json(metadata: &ViewerMetadata) -> Result<()> {
    let text = serde_json::to_string_pretty(metadata).context("serialize metadata")?;
    println!("{text}");
    Ok(())
}

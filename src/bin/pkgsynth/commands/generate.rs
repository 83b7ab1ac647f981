//! `pkgsynth generate` - run one synthesis pass and emit package.json.

use std::path::Path;

use anyhow::{Context, Result};

use pkgsynth::host::stats::StatsBundle;
use pkgsynth::host::{AssetSink, FsAssetSink};
use pkgsynth::util::config::CONFIG_FILE;
use pkgsynth::util::diagnostic;
use pkgsynth::{PackageManifest, SynthConfig, Synthesizer};

use crate::cli::GenerateArgs;

pub fn execute(args: GenerateArgs, no_color: bool) -> Result<()> {
    let config = load_config(&args)?;

    let base = PackageManifest::load(&args.base)?;
    let bundle = StatsBundle::load(&args.stats)?;
    tracing::debug!("loaded {} module records from stats", bundle.len());

    let synthesizer = Synthesizer::new(config, base)?;
    let synthesis = synthesizer.synthesize(&bundle)?;

    for diag in &synthesis.diagnostics {
        diagnostic::emit(diag, !no_color);
    }

    let mut sink = FsAssetSink::new(&args.out_dir);
    sink.emit("package.json", &synthesis.json)
        .context("failed to emit package.json")?;

    let dependency_count = synthesis
        .manifest
        .bucket(pkgsynth::DependencyBucket::Runtime)?
        .map(|deps| deps.len())
        .unwrap_or(0);
    println!(
        "wrote {} ({} dependencies)",
        sink.path_for("package.json").display(),
        dependency_count
    );

    Ok(())
}

/// Load configuration and fold CLI flag overrides into it.
fn load_config(args: &GenerateArgs) -> Result<SynthConfig> {
    let mut config = match &args.config {
        Some(path) => SynthConfig::load(path)?,
        None => SynthConfig::load_or_default(Path::new(CONFIG_FILE))?,
    };

    if !args.sources.is_empty() {
        config.source_manifests = args.sources.clone();
    }
    if args.use_installed_versions {
        config.use_installed_versions = true;
    }
    if !args.contexts.is_empty() {
        config.resolve_context_paths = args.contexts.clone();
    }
    if config.resolve_context_paths.is_empty() {
        // Installed-tree probes need at least one search root.
        config
            .resolve_context_paths
            .push(std::env::current_dir().context("cannot determine working directory")?);
    }
    config
        .exclude_dependencies
        .extend(args.excludes.iter().cloned());
    if let Some(space) = args.space {
        config.output.space = space;
    }
    if args.fail_on_missing {
        config.fail_on_missing_version = true;
    }

    Ok(config)
}

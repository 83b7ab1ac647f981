//! `pkgsynth externals` - list detected external package names.

use std::collections::BTreeSet;

use anyhow::Result;

use pkgsynth::core::{extract_package_name, is_external, Extraction};
use pkgsynth::host::stats::StatsBundle;
use pkgsynth::BundleView;

use crate::cli::ExternalsArgs;

pub fn execute(args: ExternalsArgs) -> Result<()> {
    let bundle = StatsBundle::load(&args.stats)?;

    let mut names = BTreeSet::new();
    for module in bundle.modules() {
        if !is_external(&module.identifier) {
            continue;
        }
        if let Extraction::Name(name) = extract_package_name(&module.identifier) {
            names.insert(name);
        }
    }

    for name in names {
        println!("{name}");
    }

    Ok(())
}

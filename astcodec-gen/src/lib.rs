//! Ahead-of-time generator for the `astcodec` runtime.
//!
//! Reads Rust source files, walks the struct graph reachable from a set of
//! root types and writes a file implementing `Record`, `Encode` and
//! `Decode` for every struct found, plus the type registrations needed to
//! carry those types inside dynamically typed values.
//!
//! Field numbers are kept stable across runs through a [`FieldManifest`]
//! stored next to the sources.

pub mod config;
pub mod discover;
pub mod emit;
pub mod error;
pub mod manifest;
pub mod model;

use std::{path::Path, process::Command};

use log::{info, warn};

pub use config::GenConfig;
pub use discover::{Discovered, SourceIndex};
pub use emit::EmitOptions;
pub use error::{GenError, GenResult};
pub use manifest::FieldManifest;

/// Output of one generator run.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Text of the generated file.
    pub code: String,
    /// Numbering after this run, to be persisted.
    pub manifest: FieldManifest,
    pub discovered: Discovered,
}

/// Generate code for `roots` from already indexed sources.
pub fn generate(
    index: &SourceIndex,
    roots: &[&str],
    manifest: &FieldManifest,
    options: &EmitOptions,
) -> GenResult<Generated> {
    let roots = roots
        .iter()
        .map(|root| discover::parse_root(root))
        .collect::<GenResult<Vec<_>>>()?;
    let discovered = discover::discover(index, &roots)?;

    let mut manifest = manifest.clone();
    let tokens = emit::emit(&discovered, &mut manifest, options)?;

    Ok(Generated {
        code: emit::render(&tokens),
        manifest,
        discovered,
    })
}

/// Runs the generator as configured by a [`GenConfig`].
pub struct Generator {
    config: GenConfig,
}

impl Generator {
    pub fn new(config: GenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Read the inputs and the manifest, and produce the generated code
    /// without writing anything.
    pub fn run(&self) -> GenResult<Generated> {
        let mut index = SourceIndex::new();
        for input in &self.config.inputs {
            index.add_file(input)?;
        }

        let manifest = FieldManifest::load(&self.config.manifest)?;

        let mut options = EmitOptions::new(&self.config.runtime)?;
        options.name_prefix = self.config.name_prefix.clone();
        options.types_path = self
            .config
            .types_path
            .as_deref()
            .map(emit::parse_path)
            .transpose()?;

        let roots: Vec<&str> = self.config.roots.iter().map(String::as_str).collect();
        generate(&index, &roots, &manifest, &options)
    }

    /// Write the generated file and the updated manifest.
    pub fn write(&self, generated: &Generated) -> GenResult<()> {
        let output = &self.config.output;
        std::fs::write(output, &generated.code).map_err(|source| GenError::IoError {
            path: output.clone(),
            source,
        })?;
        generated.manifest.save(&self.config.manifest)?;

        info!(
            "Wrote {} record(s) to '{}'",
            generated.discovered.records.len(),
            output.display()
        );

        if self.config.rustfmt {
            rustfmt(output);
        }
        Ok(())
    }
}

/// Format `path` in place. Formatting is cosmetic, so failures only warn.
fn rustfmt(path: &Path) {
    match Command::new("rustfmt").arg("--edition=2024").arg(path).status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!("rustfmt exited with {status} on '{}'", path.display()),
        Err(err) => warn!("Could not run rustfmt: {err}"),
    }
}

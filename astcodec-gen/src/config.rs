use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};

/// Environment variable overriding the configuration file location.
pub const ENV_CONFIG_PATH: &str = "ASTCODEC_GEN_CONFIG";

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "astcodec-gen.toml";

/// Generator settings, usually read from `astcodec-gen.toml`.
///
/// ```toml
/// inputs = ["src/ast.rs"]
/// roots = ["Handle<File>", "Vec<Handle<Ident>>"]
/// manifest = "src/ast.fields.toml"
/// output = "src/ast_codec.rs"
/// name_prefix = "ast."
/// types_path = "crate::ast"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// Rust files holding the structs to generate code for.
    pub inputs: Vec<PathBuf>,
    /// Root types, in Rust syntax.
    pub roots: Vec<String>,
    /// Field numbering manifest, read and rewritten on every run.
    pub manifest: PathBuf,
    /// Generated file.
    pub output: PathBuf,
    /// Path of the runtime crate as seen from the generated file.
    pub runtime: String,
    /// Prepended to record names to form registered type names.
    pub name_prefix: String,
    /// Module of the input structs, glob-imported by the generated file.
    pub types_path: Option<String>,
    /// Run `rustfmt` on the generated file.
    pub rustfmt: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            roots: Vec::new(),
            manifest: PathBuf::from("codec-fields.toml"),
            output: PathBuf::from("codec_gen.rs"),
            runtime: "::astcodec".to_string(),
            name_prefix: String::new(),
            types_path: None,
            rustfmt: true,
        }
    }
}

impl GenConfig {
    /// Location of the configuration file.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            return path.into();
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    pub fn parse(text: &str, file: &str) -> GenResult<Self> {
        toml::from_str(text).map_err(|source| GenError::ManifestParseError {
            source,
            file: file.to_string(),
        })
    }

    /// Load the configuration file at `path`.
    ///
    /// Relative paths inside the file are resolved against its directory.
    pub fn load(path: &Path) -> GenResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GenError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&text, &path.display().to_string())?;

        if let Some(base) = path.parent().filter(|base| !base.as_os_str().is_empty()) {
            config.rebase(base);
        }
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        let join = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        self.inputs.iter_mut().for_each(join);
        join(&mut self.manifest);
        join(&mut self.output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = GenConfig::parse("roots = [\"File\"]\n", "gen.toml").unwrap();
        assert_eq!(config.roots, ["File"]);
        assert_eq!(config.runtime, "::astcodec");
        assert!(config.rustfmt);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            GenConfig::parse("root = [\"File\"]\n", "gen.toml"),
            Err(GenError::ManifestParseError { .. })
        ));
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let mut config = GenConfig {
            inputs: vec!["ast.rs".into(), "/abs/other.rs".into()],
            ..GenConfig::default()
        };
        config.rebase(Path::new("proj"));
        assert_eq!(config.inputs[0], Path::new("proj/ast.rs"));
        assert_eq!(config.inputs[1], Path::new("/abs/other.rs"));
        assert_eq!(config.output, Path::new("proj/codec_gen.rs"));
    }
}

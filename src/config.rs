use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "banglish.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub build: BuildConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildConfig {
    pub compiler: Option<String>,
    pub std: String,
    pub opt_level: String,
    pub extra_args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compiler: None,
            std: "c++17".to_string(),
            opt_level: "2".to_string(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    pub enabled: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    pub fn parse(toml_text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str::<Config>(toml_text)?)
    }

    /// Reads `banglish.toml` under `dir`; a missing file means defaults.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text).with_context(|| format!("parse {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| format!("read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, CONFIG_FILE};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time drift")
            .as_nanos();
        std::env::temp_dir().join(format!("banglish-{}-{}-{}", prefix, std::process::id(), nonce))
    }

    #[test]
    fn empty_text_yields_defaults() {
        let cfg = Config::parse("").expect("parse");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.build.std, "c++17");
        assert_eq!(cfg.build.opt_level, "2");
        assert!(cfg.run.enabled);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = Config::parse(
            r#"
[build]
compiler = "clang++"
extra_args = ["-Wall"]

[run]
enabled = false
"#,
        )
        .expect("parse");
        assert_eq!(cfg.build.compiler.as_deref(), Some("clang++"));
        assert_eq!(cfg.build.extra_args, vec!["-Wall".to_string()]);
        assert_eq!(cfg.build.std, "c++17");
        assert!(!cfg.run.enabled);
    }

    #[test]
    fn load_handles_missing_and_malformed_files() {
        let root = temp_dir("config");
        fs::create_dir_all(&root).expect("mkdir");
        assert_eq!(Config::load(&root).expect("defaults"), Config::default());

        fs::write(root.join(CONFIG_FILE), "[build\nstd = ").expect("write");
        let err = Config::load(&root).expect_err("malformed");
        assert!(format!("{:#}", err).contains(CONFIG_FILE));
        let _ = fs::remove_dir_all(&root);
    }
}

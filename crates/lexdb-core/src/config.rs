use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    /// Builds a config from an inline TOML document, without files or env vars.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let config = Self { figment: Figment::new().merge(Toml::string(toml)) };
        config.validate_for_env("test")?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Like `get`, but a missing section yields `T::default()`.
    pub fn section<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if self.figment.contains(key) { self.get(key) } else { Ok(T::default()) }
    }

    pub fn ranker(&self) -> anyhow::Result<RankerConfig> {
        let ranker: RankerConfig = self.section("ranker")?;
        ranker.validate()?;
        Ok(ranker)
    }

    pub fn chunking(&self) -> anyhow::Result<ChunkingConfig> {
        let chunking: ChunkingConfig = self.section("chunking")?;
        chunking.validate()?;
        Ok(chunking)
    }

    pub fn data(&self) -> anyhow::Result<DataConfig> {
        self.section("data")
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        self.ranker()?;
        self.chunking()?;
        match env {
            "prod" | "production" => {
                if !self.figment.contains("data.store_path") {
                    anyhow::bail!("data.store_path must be set explicitly in production");
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

/// How inverse document frequency is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdfKind {
    /// `ln(1 + (N - df + 0.5) / (df + 0.5))`, never negative.
    #[default]
    Lucene,
    /// `ln((N - df + 0.5) / (df + 0.5))`; negative values are floored to
    /// `epsilon * mean_idf`.
    Okapi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    #[default]
    Whitespace,
    Normalized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    pub k1: f64,
    pub b: f64,
    pub idf: IdfKind,
    pub epsilon: f64,
    pub tokenizer: TokenizerKind,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75, idf: IdfKind::Lucene, epsilon: 0.25, tokenizer: TokenizerKind::Whitespace }
    }
}

impl RankerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(Error::InvalidConfig(format!("k1 must be a finite value >= 0, got {}", self.k1)));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(Error::InvalidConfig(format!("b must be within [0, 1], got {}", self.b)));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidConfig(format!("epsilon must be a finite value >= 0, got {}", self.epsilon)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_chars: 1000 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            return Err(Error::InvalidConfig("chunking.max_chars must be > 0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub txt_dir: String,
    pub store_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { txt_dir: "data/txt".to_string(), store_path: "data/chunks.json".to_string() }
    }
}

impl DataConfig {
    pub fn txt_dir(&self) -> PathBuf { expand_path(&self.txt_dir) }
    pub fn store_path(&self) -> PathBuf { expand_path(&self.store_path) }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

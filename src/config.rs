use crate::error::{Error, Result};
use crate::logging::LogFormat;
use crate::output::Layout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "uml-generator.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub discovery: DiscoveryConfig,
    pub output: OutputConfig,
    pub diagram: DiagramConfig,
    pub logging: LoggingConfig,
}

/// Where the sources live and which imports to follow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub base_directory: PathBuf,
    pub sub_package: Option<String>,
}

/// Candidate file listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Glob patterns relative to the base directory
    pub exclude: Vec<String>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

/// Diagram settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub name: String,
    pub x: i64,
    pub y: i64,
    pub step: i64,
    pub width: u32,
    pub height: u32,
}

/// Logging settings; environment variables still win when these are unset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("src"),
            sub_package: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        let layout = Layout::default();
        Self {
            name: "UML Class Diagram".to_string(),
            x: layout.x,
            y: layout.y,
            step: layout.step,
            width: layout.width,
            height: layout.height,
        }
    }
}

impl DiagramConfig {
    pub fn layout(&self) -> Layout {
        Layout {
            x: self.x,
            y: self.y,
            step: self.step,
            width: self.width,
            height: self.height,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Like `load_or_default`, but an unusable file only produces a warning
    pub fn load_lenient(path: &Path) -> Self {
        Self::load_or_default(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), "ignoring config file: {}", e);
            Self::default()
        })
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        base_directory: Option<PathBuf>,
        sub_package: Option<String>,
        output: Option<PathBuf>,
        exclude: Vec<String>,
    ) {
        if let Some(base) = base_directory {
            self.project.base_directory = base;
        }

        if let Some(sub) = sub_package {
            self.project.sub_package = Some(sub);
        }

        if let Some(out) = output {
            self.output.directory = out;
        }

        if !exclude.is_empty() {
            self.discovery.exclude.extend(exclude);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.diagram.width == 0 || self.diagram.height == 0 {
            return Err(Error::config_validation(
                "diagram width and height must be at least 1",
            ));
        }

        if self.diagram.step <= 0 {
            return Err(Error::config_validation("diagram step must be positive"));
        }

        // A blank token is a substring of every import path
        if matches!(&self.project.sub_package, Some(sub) if sub.trim().is_empty()) {
            return Err(Error::config_validation("sub_package must not be empty"));
        }

        for pattern in &self.discovery.exclude {
            glob::Pattern::new(pattern)?;
        }

        if let Some(format) = &self.logging.format {
            LogFormat::from_str(format).map_err(Error::config_validation)?;
        }

        Ok(())
    }
}

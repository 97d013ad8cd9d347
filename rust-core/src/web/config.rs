//! Server configuration

use crate::error::{Result, WaveError};
use crate::logging::LogConfig;
use crate::render::FigureConfig;
use crate::spectrum::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// How rendered images are named in the static directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactNaming {
    /// A fresh `output-<uuid>.png` per request
    #[default]
    Unique,

    /// Always `output_name`; concurrent requests overwrite each other
    Fixed,
}

/// Web server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Where uploaded WAV files are stored
    pub upload_dir: PathBuf,

    /// Where rendered figures are written and served from under `/static`
    pub static_dir: PathBuf,

    /// Image file name used in `fixed` mode and as the stem in `unique` mode
    pub output_name: String,

    pub artifact_naming: ArtifactNaming,

    /// Request body limit for uploads
    pub max_upload_bytes: usize,

    /// Stored uploads and rendered figures kept on disk, newest first
    pub keep_recent: usize,

    pub analyzer: AnalyzerConfig,
    pub figure: FigureConfig,
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // Bind to localhost unless told otherwise
            host: "127.0.0.1".to_string(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("static"),
            output_name: "output.png".to_string(),
            artifact_naming: ArtifactNaming::Unique,
            max_upload_bytes: 64 * 1024 * 1024,
            keep_recent: 20,
            analyzer: AnalyzerConfig::default(),
            figure: FigureConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| WaveError::InvalidInput(format!("invalid config: {}", e)))
    }

    /// Load from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn with_upload_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.upload_dir = dir.into();
        self
    }

    pub fn with_static_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn with_artifact_naming(mut self, naming: ArtifactNaming) -> Self {
        self.artifact_naming = naming;
        self
    }

    pub fn with_figure(mut self, figure: FigureConfig) -> Self {
        self.figure = figure;
        self
    }

    pub fn with_keep_recent(mut self, keep_recent: usize) -> Self {
        self.keep_recent = keep_recent;
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| WaveError::InvalidInput(format!("invalid listen address: {}", e)))
    }

    /// File name for the next rendered image
    pub fn artifact_name(&self) -> String {
        match self.artifact_naming {
            ArtifactNaming::Fixed => self.output_name.clone(),
            ArtifactNaming::Unique => {
                format!("{}-{}.png", self.artifact_stem(), uuid::Uuid::new_v4().simple())
            }
        }
    }

    /// Whether `name` is a figure produced in `unique` mode
    pub fn is_unique_artifact(&self, name: &str) -> bool {
        name.strip_prefix(self.artifact_stem())
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|rest| rest.ends_with(".png"))
    }

    fn artifact_stem(&self) -> &str {
        Path::new(&self.output_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
    }

    /// Create the upload and static directories if absent
    pub fn prepare_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.upload_dir)?;
        std::fs::create_dir_all(&self.static_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.keep_recent, 20);
        assert_eq!(config.analyzer.freq_limit, 4096.0);
        assert_eq!(config.analyzer.stft.n_fft, 2048);
        assert_eq!(config.analyzer.stft.hop_length, 512);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn test_partial_toml() {
        let config = ServerConfig::from_toml(
            r#"
            port = 8080
            artifact_naming = "fixed"

            [analyzer.stft]
            center = true

            [figure]
            width = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.artifact_naming, ArtifactNaming::Fixed);
        assert!(config.analyzer.stft.center);
        assert_eq!(config.analyzer.stft.n_fft, 2048);
        assert_eq!(config.figure.width, 1000);
        assert_eq!(config.figure.height, 1200);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(ServerConfig::from_toml("port = \"eighty\"").is_err());
    }

    #[test]
    fn test_artifact_names() {
        let fixed = ServerConfig::default().with_artifact_naming(ArtifactNaming::Fixed);
        assert_eq!(fixed.artifact_name(), "output.png");
        assert_eq!(fixed.artifact_name(), fixed.artifact_name());

        let unique = ServerConfig::default();
        let a = unique.artifact_name();
        let b = unique.artifact_name();
        assert!(a.starts_with("output-") && a.ends_with(".png"));
        assert_ne!(a, b);

        assert!(unique.is_unique_artifact(&a));
        assert!(!unique.is_unique_artifact("output.png"));
        assert!(!unique.is_unique_artifact("outputs-1.png"));
        assert!(!unique.is_unique_artifact("output-1.png.tmp"));
    }

    #[test]
    fn test_prepare_dirs() {
        let root = tempfile::tempdir().unwrap();
        let config = ServerConfig::default()
            .with_upload_dir(root.path().join("up"))
            .with_static_dir(root.path().join("static/img"));

        config.prepare_dirs().unwrap();
        assert!(root.path().join("up").is_dir());
        assert!(root.path().join("static/img").is_dir());
    }
}

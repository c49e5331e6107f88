//! Configuration types for Fixturist.
//!
//! Two layers:
//! - [`FixturistConfig`]: the serializable settings, usually loaded from
//!   `fixturist.yml`
//! - [`Configuration`]: the runtime registry built from those settings. It
//!   holds the single active mock adapter, the ordered global setups and the
//!   fixture store shared by every scenario.

use crate::context::{RequestContext, Setup};
use crate::fixture_store::FixtureStore;
use fixturist_adapters::{UnknownAdapterError, adapter_for};
use fixturist_proto::MockAdapter;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Serializable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixturistConfig {
    /// Root directory of the fixture tree.
    #[serde(default = "default_fixture_path")]
    pub fixture_path: PathBuf,

    /// Mocking backend name: "space" or "none".
    #[serde(default = "default_mock_framework")]
    pub mock_framework: String,

    /// Verify mock expectations after each handler call.
    #[serde(default)]
    pub verify_mocks: bool,

    /// Suppress all warnings (for CI environments).
    #[serde(default, rename = "_suppress_warnings")]
    pub suppress_warnings: bool,
}

fn default_fixture_path() -> PathBuf {
    PathBuf::from("fixtures")
}

fn default_mock_framework() -> String {
    "space".to_string()
}

impl Default for FixturistConfig {
    fn default() -> Self {
        Self {
            fixture_path: default_fixture_path(),
            mock_framework: default_mock_framework(),
            verify_mocks: false,
            suppress_warnings: false,
        }
    }
}

impl FixturistConfig {
    /// Loads settings from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        debug!(path = %path_ref.display(), "Loading configuration from file");
        let content = std::fs::read_to_string(path_ref)?;
        let config: Self = serde_yaml::from_str(&content)?;
        debug!(
            fixture_path = %config.fixture_path.display(),
            mock_framework = %config.mock_framework,
            verify_mocks = config.verify_mocks,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validates the settings and returns warnings.
    ///
    /// Hard errors (an empty fixture path) are returned as `Err`.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        if self.fixture_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "fixture_path".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let mut warnings = Vec::new();
        if self.suppress_warnings {
            return Ok(warnings);
        }

        if self
            .fixture_path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            warnings.push(ConfigWarning::InvalidValue {
                field: "fixture_path".to_string(),
                message: format!(
                    "'{}' points outside the project directory",
                    self.fixture_path.display()
                ),
            });
        }

        if self.verify_mocks && self.mock_framework.eq_ignore_ascii_case("none") {
            warnings.push(ConfigWarning::IneffectiveSetting {
                field: "verify_mocks".to_string(),
                reason: "mock_framework 'none' has no expectations to verify".to_string(),
            });
        }

        Ok(warnings)
    }
}

/// Configuration warnings emitted during validation.
#[derive(Debug, Clone)]
pub enum ConfigWarning {
    /// A setting has no effect with the rest of the configuration.
    IneffectiveSetting { field: String, reason: String },
    /// A field has a questionable value.
    InvalidValue { field: String, message: String },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::IneffectiveSetting { field, reason } => {
                write!(f, "Warning [{field}]: has no effect ({reason})")
            }
            ConfigWarning::InvalidValue { field, message } => {
                write!(f, "Warning [{field}]: {message}")
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error(transparent)]
    UnknownFramework(#[from] UnknownAdapterError),
}

/// The runtime registry shared by every scenario run.
///
/// Holds exactly one mock adapter. Swapping adapters means building a new
/// configuration; there is no switching mid-run.
pub struct Configuration {
    settings: FixturistConfig,
    adapter: Arc<dyn MockAdapter>,
    global_setups: Vec<Setup>,
    store: FixtureStore,
}

impl Configuration {
    /// Starts building a configuration from default settings.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new(FixturistConfig::default())
    }

    /// Builds a configuration from settings, resolving the adapter by name.
    pub fn from_config(settings: FixturistConfig) -> Result<Self, ConfigError> {
        ConfigurationBuilder::new(settings).build()
    }

    /// Loads, validates and builds a configuration from a YAML file.
    ///
    /// Validation warnings are logged.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let settings = FixturistConfig::from_file(path)?;
        for warning in settings.validate()? {
            warn!("{warning}");
        }
        Self::from_config(settings)
    }

    /// Appends a global setup after the ones already registered.
    pub fn with_setup<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut RequestContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.global_setups.push(Arc::new(f));
        self
    }

    /// Returns the settings this configuration was built from.
    pub fn settings(&self) -> &FixturistConfig {
        &self.settings
    }

    /// Returns the active mock adapter.
    pub fn adapter(&self) -> &dyn MockAdapter {
        self.adapter.as_ref()
    }

    /// Returns the global setups in the order they run.
    pub fn global_setups(&self) -> &[Setup] {
        &self.global_setups
    }

    /// Returns the fixture store.
    pub fn store(&self) -> &FixtureStore {
        &self.store
    }

    /// Returns whether runs verify mock expectations before teardown.
    pub fn verify_mocks(&self) -> bool {
        self.settings.verify_mocks
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("settings", &self.settings)
            .field("adapter", &self.adapter.framework_name())
            .field("global_setups", &self.global_setups.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Configuration`].
pub struct ConfigurationBuilder {
    settings: FixturistConfig,
    adapter: Option<Arc<dyn MockAdapter>>,
    global_setups: Vec<Setup>,
}

impl ConfigurationBuilder {
    /// Starts from the given settings.
    pub fn new(settings: FixturistConfig) -> Self {
        Self {
            settings,
            adapter: None,
            global_setups: Vec::new(),
        }
    }

    /// Sets the fixture root.
    pub fn fixture_path(mut self, path: impl AsRef<Path>) -> Self {
        self.settings.fixture_path = path.as_ref().to_path_buf();
        self
    }

    /// Uses the given adapter instead of resolving `mock_framework` by name.
    pub fn mock_with(self, adapter: impl MockAdapter + 'static) -> Self {
        self.mock_with_shared(Arc::new(adapter))
    }

    /// Uses an adapter the caller keeps a handle to.
    pub fn mock_with_shared(mut self, adapter: Arc<dyn MockAdapter>) -> Self {
        self.settings.mock_framework = adapter.framework_name().to_string();
        self.adapter = Some(adapter);
        self
    }

    /// Verifies mock expectations after each handler call.
    pub fn verify_mocks(mut self, verify: bool) -> Self {
        self.settings.verify_mocks = verify;
        self
    }

    /// Appends a global setup. Global setups run in registration order,
    /// before every scenario's own setups.
    pub fn setup<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut RequestContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.global_setups.push(Arc::new(f));
        self
    }

    /// Appends an already wrapped global setup.
    pub fn shared_setup(mut self, setup: Setup) -> Self {
        self.global_setups.push(setup);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Result<Configuration, ConfigError> {
        if self.settings.fixture_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "fixture_path".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let adapter = match self.adapter {
            Some(adapter) => adapter,
            None => adapter_for(&self.settings.mock_framework)?,
        };
        debug!(
            framework = adapter.framework_name(),
            global_setups = self.global_setups.len(),
            "Configuration built"
        );

        Ok(Configuration {
            store: FixtureStore::new(&self.settings.fixture_path),
            settings: self.settings,
            adapter,
            global_setups: self.global_setups,
        })
    }
}

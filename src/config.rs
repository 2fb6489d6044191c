use crate::error::{Result, SmartGrowError};
use crate::logic::{FuzzyLighting, LightingPolicy, NightWindow, TimeOfDayLighting};
use dialoguer::{Confirm, Input, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_bind() -> String {
    "0.0.0.0:8000".into()
}

fn default_body_limit() -> usize {
    16 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingPolicyKind {
    #[default]
    TimeOfDay,
    Fuzzy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LightingConfig {
    #[serde(default)]
    pub policy: LightingPolicyKind,
    #[serde(default = "default_night_start")]
    pub night_start_hour: u32,
    #[serde(default = "default_night_end")]
    pub night_end_hour: u32,
}

fn default_night_start() -> u32 {
    18
}

fn default_night_end() -> u32 {
    6
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            policy: LightingPolicyKind::TimeOfDay,
            night_start_hour: default_night_start(),
            night_end_hour: default_night_end(),
        }
    }
}

impl LightingConfig {
    pub fn build_policy(&self) -> Result<Box<dyn LightingPolicy>> {
        let policy: Box<dyn LightingPolicy> = match self.policy {
            LightingPolicyKind::TimeOfDay => Box::new(TimeOfDayLighting::new(NightWindow::new(
                self.night_start_hour,
                self.night_end_hour,
            )?)),
            LightingPolicyKind::Fuzzy => Box::new(FuzzyLighting::new()?),
        };
        Ok(policy)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ControlConfig {
    /// Drop an actuator's level to 0 as soon as automation is disabled.
    #[serde(default)]
    pub reset_level_on_manual: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p.clone(),
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(SmartGrowError::Config(format!(
                "Config file not found at {:?}. Run `smartgrow init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| SmartGrowError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parses YAML after substituting `${VAR}` placeholders.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| SmartGrowError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config if one can be found, otherwise the built-in defaults.
    pub fn load_or_default(config_override: Option<&PathBuf>) -> Result<Self> {
        if Self::exists(config_override) {
            Self::load(config_override)
        } else {
            tracing::warn!("No configuration found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        NightWindow::new(self.lighting.night_start_hour, self.lighting.night_end_hour)?;
        if self.server.bind.trim().is_empty() {
            return Err(SmartGrowError::Config("server.bind must not be empty".into()));
        }
        Ok(())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("smartgrow").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/smartgrow/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SmartGrowError::Config("Cannot determine config directory".into()))?
            .join("smartgrow");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up SmartGrow!");
        println!();

        println!("HTTP server");
        let bind: String = Input::new()
            .with_prompt("  Bind address")
            .default(default_bind())
            .interact_text()
            .map_err(|e| SmartGrowError::Config(format!("Input error: {}", e)))?;

        println!();
        println!("Lighting");
        let policies = ["Time of day (night window)", "Fuzzy (ambient light sensor)"];
        let choice = Select::new()
            .with_prompt("  Policy")
            .items(&policies)
            .default(0)
            .interact()
            .map_err(|e| SmartGrowError::Config(format!("Input error: {}", e)))?;

        let mut lighting = LightingConfig::default();
        if choice == 0 {
            lighting.night_start_hour = Input::new()
                .with_prompt("  Night starts at hour")
                .default(default_night_start())
                .interact_text()
                .map_err(|e| SmartGrowError::Config(format!("Input error: {}", e)))?;
            lighting.night_end_hour = Input::new()
                .with_prompt("  Night ends at hour")
                .default(default_night_end())
                .interact_text()
                .map_err(|e| SmartGrowError::Config(format!("Input error: {}", e)))?;
        } else {
            lighting.policy = LightingPolicyKind::Fuzzy;
        }

        println!();
        println!("Control");
        let reset_level_on_manual = Confirm::new()
            .with_prompt("  Switch actuators off when automation is disabled?")
            .default(false)
            .interact()
            .map_err(|e| SmartGrowError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            server: ServerConfig {
                bind,
                ..ServerConfig::default()
            },
            lighting,
            control: ControlConfig {
                reset_level_on_manual,
            },
            database: DatabaseConfig::default(),
        };
        config.validate()?;

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| SmartGrowError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# SmartGrow Configuration\n# Generated by `smartgrow init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return content.to_string();
        };

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("SMARTGROW_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| SmartGrowError::Config("Cannot determine data directory".into()))?
            .join("smartgrow");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    /// The configured database path wins over the data directory.
    pub fn db_path(&self, data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        match (&self.database.path, data_dir_override) {
            (Some(path), None) => Ok(path.clone()),
            _ => Ok(Self::data_dir(data_dir_override)?.join("smartgrow.db")),
        }
    }
}

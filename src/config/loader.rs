//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading scheduling
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    LaborConstraints, ScheduleConfig, SectorMap, TemplateRegistry, ALL_SECTOR, CUSTOM_CODE,
};

/// Loads and provides access to the scheduling configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// provides access to the shift-template registry, labor constraints, and
/// print-sector mapping.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── templates.yaml    # Shift-template registry
/// ├── constraints.yaml  # Labor constraint thresholds
/// └── sectors.yaml      # Print-sector to role mapping
/// ```
///
/// # Example
///
/// ```no_run
/// use rota_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let template = loader.config().templates().get('M').unwrap();
/// println!("Morning shift starts at {}", template.start);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ScheduleConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g. "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A reserved identifier (`X` template, `all` sector) is configured
    /// - A split template names only one half of its second segment
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let templates_path = path.join("templates.yaml");
        let templates = Self::load_yaml::<TemplateRegistry>(&templates_path)?;

        let constraints_path = path.join("constraints.yaml");
        let constraints = Self::load_yaml::<LaborConstraints>(&constraints_path)?;

        let sectors_path = path.join("sectors.yaml");
        let sectors = Self::load_yaml::<SectorMap>(&sectors_path)?;

        Self::check_reserved(&templates, &sectors)?;

        Ok(Self {
            config: ScheduleConfig::new(templates, constraints, sectors),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Rejects configurations that shadow reserved identifiers or define
    /// half a split segment.
    fn check_reserved(templates: &TemplateRegistry, sectors: &SectorMap) -> EngineResult<()> {
        if templates.templates.contains_key(&CUSTOM_CODE) {
            return Err(EngineError::ConfigInvalid {
                message: format!("template code '{CUSTOM_CODE}' is reserved for custom shifts"),
            });
        }
        if sectors.sectors.contains_key(ALL_SECTOR) {
            return Err(EngineError::ConfigInvalid {
                message: format!("sector name '{ALL_SECTOR}' is reserved as the identity filter"),
            });
        }
        for (code, tpl) in &templates.templates {
            if tpl.second_start.is_some() != tpl.second_end.is_some() {
                return Err(EngineError::ConfigInvalid {
                    message: format!(
                        "template '{code}' defines only one end of its second segment"
                    ),
                });
            }
        }
        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
    }

    #[test]
    fn test_default_templates_present() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let templates = loader.config().templates();

        for code in ['M', 'T', 'N', 'P', 'D'] {
            assert!(templates.get(code).is_ok(), "missing template {code}");
        }
    }

    #[test]
    fn test_morning_template_times() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let morning = loader.config().templates().get('M').unwrap();

        assert_eq!(morning.start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(morning.end, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert_eq!(morning.break_minutes, 30);
    }

    #[test]
    fn test_split_template_has_second_segment() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let split = loader.config().templates().get('P').unwrap();

        assert!(split.second_start.is_some());
        assert!(split.second_end.is_some());
    }

    #[test]
    fn test_default_constraints() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let constraints = loader.config().constraints();

        assert_eq!(constraints.max_weekly_hours, Decimal::from_str("40").unwrap());
        assert_eq!(constraints.min_rest_between_shifts, 12);
        assert_eq!(constraints.min_days_off_per_week, 1);
        assert_eq!(
            constraints.overtime_multiplier,
            Decimal::from_str("1.5").unwrap()
        );
    }

    #[test]
    fn test_default_sectors() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let sectors = loader.config().sectors();

        assert!(sectors.allowed_roles("kitchen").is_some());
        assert!(!sectors.allowed_roles("kitchen").unwrap().is_empty());
        assert!(sectors.allowed_roles("front_of_house").is_some());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("templates.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_reserved_template_code_rejected() {
        let templates: TemplateRegistry = serde_yaml::from_str(
            r#"
templates:
  X: { label: "Custom", start: "09:00:00", end: "17:00:00" }
"#,
        )
        .unwrap();
        let sectors = SectorMap {
            sectors: Default::default(),
        };

        let result = ConfigLoader::check_reserved(&templates, &sectors);
        assert!(matches!(result, Err(EngineError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_reserved_sector_name_rejected() {
        let templates = TemplateRegistry {
            templates: Default::default(),
        };
        let sectors: SectorMap = serde_yaml::from_str(
            r#"
sectors:
  all: [waiter]
"#,
        )
        .unwrap();

        let result = ConfigLoader::check_reserved(&templates, &sectors);
        assert!(matches!(result, Err(EngineError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_half_split_template_rejected() {
        let templates: TemplateRegistry = serde_yaml::from_str(
            r#"
templates:
  P: { label: "Split", start: "12:00:00", end: "16:00:00", second_start: "19:00:00" }
"#,
        )
        .unwrap();
        let sectors = SectorMap {
            sectors: Default::default(),
        };

        let result = ConfigLoader::check_reserved(&templates, &sectors);
        assert!(matches!(result, Err(EngineError::ConfigInvalid { .. })));
    }
}

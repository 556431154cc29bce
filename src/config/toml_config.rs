use crate::adapters::{firebase, nominatim};
use crate::core::search::DEFAULT_RESULT_LIMIT;
use crate::domain::model::{Coordinate, PermissionStatus, DEFAULT_SEARCH_RADIUS_METERS};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_coordinate, validate_path, validate_positive_number, validate_radius,
    validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub auth: AuthConfig,
    pub location: LocationConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub radius_meters: f64,
    pub limit: usize,
    pub request_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: nominatim::DEFAULT_ENDPOINT.to_string(),
            radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            limit: DEFAULT_RESULT_LIMIT,
            request_timeout_seconds: 15,
            user_agent: nominatim::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub request_timeout_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            endpoint: firebase::DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub permission: PermissionStatus,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Guadalajara, Jalisco
        Self {
            latitude: 20.6597,
            longitude: -103.3496,
            permission: PermissionStatus::AuthorizedWhenInUse,
        }
    }
}

impl LocationConfig {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: "./safepath-data".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FIREBASE_API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search.request_timeout_seconds)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth.request_timeout_seconds)
    }

    /// 驗證登入相關設定；只有用到驗證功能時才需要 API key
    pub fn require_api_key(&self) -> Result<&str> {
        let key = validate_required_field("auth.api_key", &self.auth.api_key)?;
        if key.starts_with("${") {
            return Err(AppError::MissingConfigError {
                field: "auth.api_key".to_string(),
            });
        }
        Ok(key)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("search.endpoint", &self.search.endpoint)?;
        validate_radius("search.radius_meters", self.search.radius_meters)?;
        validate_positive_number("search.limit", self.search.limit, 1)?;
        validate_positive_number(
            "search.request_timeout_seconds",
            self.search.request_timeout_seconds as usize,
            1,
        )?;
        validate_url("auth.endpoint", &self.auth.endpoint)?;
        validate_coordinate("location", &self.location.coordinate())?;
        validate_path("storage.data_path", &self.storage.data_path)?;
        Ok(())
    }
}

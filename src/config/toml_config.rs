use crate::core::cart::DEFAULT_CART_KEY;
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_required_field,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub builder: BuilderConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    pub webhook: Option<WebhookConfig>,
    pub site: Option<SiteConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
    pub cart_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "./.spa-cart".to_string(),
            cart_key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// 選取後停留多久才進到下一步 (讓 highlight 動畫播完)
    pub advance_delay_ms: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            advance_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub dismiss_after_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default)]
    pub enabled: bool,
    pub application_id: Option<String>,
    pub location_id: Option<String>,
    pub simulated_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Contact page that receives `?checkout=true&total=...`
    pub contact_url: String,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ShopError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config {} not found, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ShopError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SQUARE_APP_ID})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShopError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.builder.advance_delay_ms)
    }

    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.notifications.dismiss_after_ms)
    }

    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment.simulated_delay_ms.unwrap_or(1500))
    }

    pub fn webhook_timeout(&self) -> Duration {
        let secs = self
            .webhook
            .as_ref()
            .and_then(|w| w.timeout_seconds)
            .unwrap_or(30);
        Duration::from_secs(secs)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_path("storage.path", &self.storage.path)?;
        validate_non_empty_string("storage.cart_key", &self.storage.cart_key)?;
        validate_range("builder.advance_delay_ms", self.builder.advance_delay_ms, 0, 5_000)?;
        validate_range(
            "notifications.dismiss_after_ms",
            self.notifications.dismiss_after_ms,
            0,
            60_000,
        )?;

        if self.payment.enabled {
            let app_id = validate_required_field("payment.application_id", &self.payment.application_id)?;
            validate_non_empty_string("payment.application_id", app_id)?;
            let location = validate_required_field("payment.location_id", &self.payment.location_id)?;
            validate_non_empty_string("payment.location_id", location)?;
        }

        if let Some(webhook) = &self.webhook {
            validate_url("webhook.endpoint", &webhook.endpoint)?;
            if let Some(timeout) = webhook.timeout_seconds {
                validate_range("webhook.timeout_seconds", timeout, 1, 300)?;
            }
        }

        if let Some(site) = &self.site {
            validate_url("site.contact_url", &site.contact_url)?;
        }

        Ok(())
    }
}

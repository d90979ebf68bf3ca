use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Payment gateway unavailable: {reason}")]
    GatewayUnavailable { reason: String },

    #[error("Payment failed: {message}")]
    PaymentError { message: String },

    #[error("Order webhook failed: {message}")]
    WebhookError { message: String },

    #[error("{kind} not found: {name}")]
    NotFound { kind: String, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者輸入錯誤，操作中止
    Validation,
    /// 外部依賴 (付款 SDK、webhook) 不可用或失敗
    ExternalDependency,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShopError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::NotFound { .. } => ErrorCategory::Validation,
            Self::HttpError(_)
            | Self::GatewayUnavailable { .. }
            | Self::PaymentError { .. }
            | Self::WebhookError { .. } => ErrorCategory::ExternalDependency,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::ExternalDependency => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ValidationError { .. } => "Check the highlighted input and try again".to_string(),
            Self::NotFound { kind, .. } => {
                format!("Run `spa-cart catalog` to list the available {} entries", kind)
            }
            Self::GatewayUnavailable { .. } => {
                "Enable [payment] in the config and set application_id / location_id".to_string()
            }
            Self::PaymentError { .. } => "Verify the card details or use another card".to_string(),
            Self::WebhookError { .. } | Self::HttpError(_) => {
                "Check the webhook endpoint and network connectivity, then resubmit".to_string()
            }
            Self::IoError(_) | Self::SerializationError(_) => {
                "Check that the storage directory exists and is writable".to_string()
            }
            Self::MissingConfigError { field } => format!("Add '{}' to the config file", field),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again".to_string()
            }
        }
    }

    /// 給終端使用者看的訊息 (對應網頁上的 alert)
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => message.clone(),
            Self::NotFound { kind, name } => format!("Unknown {}: {}", kind, name),
            Self::GatewayUnavailable { .. } => {
                "Payment system is currently unavailable. Please contact us to complete your booking."
                    .to_string()
            }
            Self::PaymentError { message } => format!("Payment failed: {}", message),
            Self::WebhookError { message } => format!("Order could not be submitted: {}", message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;

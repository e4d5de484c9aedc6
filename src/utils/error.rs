use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssignerError {
    #[error("Configuration error: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid field '{field}' in rule '{line}' (expected title, text, label or any)")]
    InvalidFieldError { field: String, line: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    PatternCompileError {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Could not list issues for repository {repo}: {message}")]
    IssueFetchError { repo: String, message: String },

    #[error("Could not update issue {repo}#{number}: {message}")]
    IssueUpdateError {
        repo: String,
        number: u64,
        message: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AssignerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            message: message.into(),
        }
    }

    /// Errors raised while loading rules or credentials, before any issue is touched.
    pub fn is_config_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigParseError { .. }
            | Self::InvalidFieldError { .. }
            | Self::PatternCompileError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IssueFetchError { .. } | Self::IssueUpdateError { .. } | Self::ApiError(_) => {
                ErrorCategory::Network
            }
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::IssueUpdateError { .. } => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ConfigParseError { .. } => {
                "Check the TOML syntax; each rule line must look like <field>:<pattern> and every user may appear only once"
            }
            Self::InvalidFieldError { .. } => "Use one of the fields: title, text, label, any",
            Self::PatternCompileError { .. } => {
                "Check the regular expression syntax of the rule pattern"
            }
            Self::MissingConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the [github] section of the auth configuration file"
            }
            Self::IssueFetchError { .. } => {
                "Check that the repository exists and the credentials can read its issues"
            }
            Self::IssueUpdateError { .. } => {
                "Check that the credentials have push access and the users can be assigned"
            }
            Self::ApiError(_) => "Check network connectivity and the configured API URL",
            Self::IoError(_) => "Check that the configuration files exist and are readable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("GitHub communication problem: {}", self),
            ErrorCategory::System => format!("System problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssignerError>;

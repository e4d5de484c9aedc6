use crate::config::substitute_env_vars;
use crate::utils::error::{AssignerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_repo_slug, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Contents of the auth configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub github: GitHubSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSection {
    pub repo: String,
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_url: Option<String>,
}

/// How requests to GitHub are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token(***)"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

impl AuthConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssignerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| {
            AssignerError::config(format!("auth file is not valid TOML: {}", e))
        })
    }

    pub fn repo(&self) -> &str {
        &self.github.repo
    }

    pub fn api_url(&self) -> &str {
        self.github.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Exactly one of `token` or `username` + `password` must be configured.
    pub fn credentials(&self) -> Result<Credentials> {
        let github = &self.github;
        match (&github.token, &github.username, &github.password) {
            (Some(token), None, None) => {
                validate_non_empty_string("github.token", token)?;
                Ok(Credentials::Token(token.clone()))
            }
            (None, Some(username), Some(password)) => {
                validate_non_empty_string("github.username", username)?;
                validate_non_empty_string("github.password", password)?;
                Ok(Credentials::Basic {
                    username: username.clone(),
                    password: password.clone(),
                })
            }
            (None, None, None) => Err(AssignerError::MissingConfigError {
                field: "github.token (or github.username and github.password)".to_string(),
            }),
            (None, Some(_), None) => Err(AssignerError::MissingConfigError {
                field: "github.password".to_string(),
            }),
            (None, None, Some(_)) => Err(AssignerError::MissingConfigError {
                field: "github.username".to_string(),
            }),
            (Some(_), _, _) => Err(AssignerError::InvalidConfigValueError {
                field: "github".to_string(),
                value: "token, username/password".to_string(),
                reason: "Configure either a token or a username and password, not both"
                    .to_string(),
            }),
        }
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<()> {
        validate_repo_slug("github.repo", &self.github.repo)?;
        validate_url("github.api_url", self.api_url())?;
        self.credentials()?;
        Ok(())
    }
}

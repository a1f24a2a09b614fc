use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("GitHub token required")]
    MissingCredentialError,

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Could not create repo: {status} {body}")]
    RepoCreationError { status: u16, body: String },

    #[error("git {command} failed: {stderr}")]
    GitError { command: String, stderr: String },

    #[error("git push failed: {stderr}")]
    PushError { stderr: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Remote,
    VersionControl,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeployError {
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredentialError
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::ApiError(_) => ErrorCategory::Network,
            Self::RepoCreationError { .. } => ErrorCategory::Remote,
            Self::GitError { .. } | Self::PushError { .. } => ErrorCategory::VersionControl,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Remote | ErrorCategory::VersionControl => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 依嚴重程度對應的行程結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingCredentialError => {
                "Pass --token YOUR_TOKEN or export GITHUB_TOKEN=YOUR_TOKEN. \
                 Create one at github.com → Settings → Developer Settings → \
                 Personal Access Tokens; required scopes: repo, write:pages"
                    .to_string()
            }
            Self::MissingConfigError { field } => {
                format!("Provide '{}' on the command line or in the config file", field)
            }
            Self::InvalidConfigValueError { field, .. }
            | Self::ConfigValidationError { field, .. } => {
                format!("Check the value of '{}'", field)
            }
            Self::ApiError(_) => {
                "Check your network connection and that api.github.com is reachable".to_string()
            }
            Self::RepoCreationError { status, .. } => match status {
                401 | 403 => "Check that the token is valid and has the 'repo' scope".to_string(),
                422 => "A repository with this name may already exist under another owner"
                    .to_string(),
                _ => "Inspect the response body above for details".to_string(),
            },
            Self::GitError { .. } => "Make sure git is installed and on your PATH".to_string(),
            Self::PushError { .. } => {
                "Check that the token can push to the repository and that the network is up"
                    .to_string()
            }
            Self::IoError(_) => "Check file permissions and available disk space".to_string(),
            Self::SerializationError(_) => {
                "The API returned data in an unexpected shape".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingCredentialError => "GitHub token required.".to_string(),
            Self::RepoCreationError { status, body } => {
                format!("Could not create repo: {} {}", status, body)
            }
            Self::PushError { stderr } => format!("Push to GitHub failed: {}", stderr),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

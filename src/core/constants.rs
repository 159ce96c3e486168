//! Constants for environment variables and external command arguments
//!
//! This module defines the names of the environment variables the release
//! run is configured with, and the fixed pieces of the git and generator
//! invocations.

/// Environment variable names
pub mod env {
    /// Presence flag that stops the run after the first SDK is tagged
    pub const DRY_RUN: &str = "DRY_RUN";

    /// Path or URL of the OpenAPI specification
    pub const API_SPEC: &str = "YML";

    /// Path or URL of the SDK definitions document
    pub const DEFINITION_FILE: &str = "DEFINITION_FILE";

    /// Comma separated list of SDK identifiers
    pub const SDKS: &str = "SDKS";

    /// GitHub organization used to build clone URLs
    pub const ORG_NAME: &str = "ORG_NAME";

    /// Code generator binary
    pub const GENERATOR: &str = "OPENAPI_GENERATOR";

    /// Directory repositories are cloned into
    pub const WORKSPACE_DIR: &str = "WORKSPACE_DIR";

    /// Enables pushing branches and tags
    pub const PUSH: &str = "PUSH";

    /// Logging level
    pub const LOG_LEVEL: &str = "LOG_LEVEL";

    /// Timeout in seconds for fetching documents over HTTP
    pub const HTTP_TIMEOUT: &str = "HTTP_TIMEOUT";

    /// Optional TOML settings file
    pub const CONFIG_PATH: &str = "CONFIG_PATH";
}

/// Git command constants
pub mod git {
    /// Git binary
    pub const BIN: &str = "git";

    /// Host prefix for SSH clone URLs
    pub const SSH_HOST: &str = "git@github.com";

    /// Commit and tag message prefix
    pub const VERSION_MESSAGE_PREFIX: &str = "Version";
}

/// Generator command constants
pub mod generator {
    /// Default generator binary, resolved through PATH
    pub const DEFAULT_BIN: &str = "openapi-generator";

    /// Generator subcommand
    pub const GENERATE: &str = "generate";
}

/// Placeholder substituted into repository name templates
pub const PACKAGE_PLACEHOLDER: &str = "package";

/// Key of the identifier field in each definitions entry
pub const DEFINITION_ID_KEY: &str = "value";

//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MARKETPLACE_*` environment variables and
//! configuration files, in increasing order of precedence as defined by
//! `ortho_config`. Unset values fall back to the defaults below. Boolean
//! switches are read from the environment and files only.

use std::ffi::OsString;
use std::net::{IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::domain::CreateUserRequest;
use crate::domain::validation::{
    FieldError, SchemaRegistry, UnknownOperation, ValidationResult, validate_as,
};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const ADMIN_NAME: &str = "Administrator";

/// Errors raised while loading or interpreting [`ServerSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Configuration sources could not be merged.
    #[error("failed to load settings: {0}")]
    Load(String),
    /// `host` is not an IP address.
    #[error("invalid host `{host}`: {source}")]
    InvalidHost {
        /// The configured host.
        host: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// Only one of the admin seed credentials was supplied.
    #[error("admin_email and admin_password must be set together")]
    IncompleteAdminSeed,
    /// The admin seed breaks the account creation rules.
    #[error("invalid admin seed: {}", describe(errors))]
    InvalidAdminSeed {
        /// Failures reported by the `create_user` schema.
        errors: Vec<FieldError>,
    },
    /// The registry cannot validate the admin seed.
    #[error(transparent)]
    UnknownOperation(#[from] UnknownOperation),
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field(), error.message()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Emit logs as JSON lines instead of human-readable text.
    #[ortho_config(default = false, skip_cli)]
    pub log_json: bool,
    /// Serve Swagger UI at `/docs`.
    #[ortho_config(skip_cli)]
    pub enable_docs: Option<bool>,
    /// Email of an admin account created at start-up.
    pub admin_email: Option<String>,
    /// Password of the admin account created at start-up.
    pub admin_password: Option<String>,
}

impl ServerSettings {
    /// Load settings from the process arguments and environment.
    ///
    /// # Errors
    /// Returns [`SettingsError::Load`] when a source cannot be parsed.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::load_from_iter(args).map_err(|err| SettingsError::Load(err.to_string()))
    }

    /// Configured host, falling back to all interfaces.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Configured port, falling back to 8080.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Whether Swagger UI is served; defaults to on in debug builds only.
    #[must_use]
    pub fn docs_enabled(&self) -> bool {
        self.enable_docs.unwrap_or(cfg!(debug_assertions))
    }

    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidHost`] when `host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host();
        let ip: IpAddr = host.parse().map_err(|source| SettingsError::InvalidHost {
            host: host.to_owned(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.port()))
    }

    /// Admin account to seed, checked against the `create_user` schema.
    ///
    /// # Errors
    /// Returns [`SettingsError::IncompleteAdminSeed`] when only one of the
    /// two credentials is set and [`SettingsError::InvalidAdminSeed`] when
    /// they break the account creation rules.
    pub fn admin_seed(
        &self,
        registry: &SchemaRegistry,
    ) -> Result<Option<CreateUserRequest>, SettingsError> {
        let (email, password) = match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => (email, password),
            (None, None) => return Ok(None),
            _ => return Err(SettingsError::IncompleteAdminSeed),
        };
        let raw = json!({
            "email": email,
            "password": password,
            "name": ADMIN_NAME,
            "role": "admin",
            "isActive": true,
        });
        match validate_as::<CreateUserRequest>(registry, &raw)? {
            ValidationResult::Valid(request) => Ok(Some(request)),
            ValidationResult::Invalid(errors) => Err(SettingsError::InvalidAdminSeed { errors }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use env_lock::lock_env;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::UserRole;

    const VARS: [&str; 6] = [
        "MARKETPLACE_HOST",
        "MARKETPLACE_PORT",
        "MARKETPLACE_LOG_JSON",
        "MARKETPLACE_ENABLE_DOCS",
        "MARKETPLACE_ADMIN_EMAIL",
        "MARKETPLACE_ADMIN_PASSWORD",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_args([OsString::from("marketplace-api")])
            .expect("config should load")
    }

    #[fixture]
    fn registry() -> SchemaRegistry {
        SchemaRegistry::builtin().expect("builtin registry")
    }

    fn env_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing(registry: SchemaRegistry) {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.host(), DEFAULT_HOST);
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert!(!settings.log_json);
        assert_eq!(settings.docs_enabled(), cfg!(debug_assertions));
        assert!(settings.admin_seed(&registry).expect("no partial seed").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected(registry: SchemaRegistry) {
        let _guard = lock_env(env_with(&[
            ("MARKETPLACE_HOST", "127.0.0.1"),
            ("MARKETPLACE_PORT", "9090"),
            ("MARKETPLACE_LOG_JSON", "true"),
            ("MARKETPLACE_ENABLE_DOCS", "false"),
            ("MARKETPLACE_ADMIN_EMAIL", "admin@example.com"),
            ("MARKETPLACE_ADMIN_PASSWORD", "adminpass"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("valid address"),
            "127.0.0.1:9090".parse().expect("socket address")
        );
        assert!(settings.log_json);
        assert!(!settings.docs_enabled());
        let seed = settings
            .admin_seed(&registry)
            .expect("valid seed")
            .expect("seed set");
        assert_eq!(seed.email, "admin@example.com");
        assert_eq!(seed.password.expose(), "adminpass");
        assert_eq!(seed.name, ADMIN_NAME);
        assert_eq!(seed.role, Some(UserRole::Admin));
    }

    #[rstest]
    fn partial_admin_seed_is_rejected(registry: SchemaRegistry) {
        let _guard = lock_env(env_with(&[("MARKETPLACE_ADMIN_EMAIL", "admin@example.com")]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.admin_seed(&registry),
            Err(SettingsError::IncompleteAdminSeed)
        ));
    }

    #[rstest]
    #[case("root", "adminpass", &["email"])]
    #[case("admin@example.com", "abc", &["password"])]
    #[case("root", "abc", &["email", "password"])]
    fn admin_seed_follows_account_rules(
        registry: SchemaRegistry,
        #[case] email: &str,
        #[case] password: &str,
        #[case] fields: &[&str],
    ) {
        let _guard = lock_env(env_with(&[
            ("MARKETPLACE_ADMIN_EMAIL", email),
            ("MARKETPLACE_ADMIN_PASSWORD", password),
        ]));

        let settings = load_from_empty_args();
        let Err(SettingsError::InvalidAdminSeed { errors }) = settings.admin_seed(&registry) else {
            panic!("weak admin seed accepted");
        };
        let reported: Vec<&str> = errors.iter().map(FieldError::field).collect();
        assert_eq!(reported, fields);
    }

    #[rstest]
    fn hostnames_are_not_bind_addresses() {
        let _guard = lock_env(env_with(&[("MARKETPLACE_HOST", "localhost")]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidHost { .. })
        ));
    }
}

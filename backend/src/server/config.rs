//! Runtime settings and the HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use chrono::FixedOffset;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

use chore_roster::outbound::notify::GreenApiConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PHOTO_DIR: &str = "uploads";
const PHOTO_ROUTE: &str = "/api/v1/photos";
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

/// Settings loaded from CLI arguments and `ROSTER_*` environment variables.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROSTER")]
pub struct RosterSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; rosters live in memory when absent.
    pub database_url: Option<String>,
    /// Directory holding proof photos.
    pub photo_dir: Option<PathBuf>,
    /// Password granting a session-scoped admin claim.
    pub admin_password: Option<String>,
    /// Household UTC offset in minutes, used to find week boundaries.
    #[ortho_config(default = 0)]
    pub utc_offset_minutes: i32,
    /// Create the resident accounts on startup.
    #[ortho_config(default = false)]
    pub seed_accounts: bool,
    /// Public origin used to build photo links in chat messages.
    pub public_base_url: Option<String>,
    /// Green API host override.
    pub green_api_url: Option<String>,
    /// Green API instance identifier.
    pub green_api_instance_id: Option<String>,
    /// Green API instance token.
    pub green_api_token: Option<String>,
    /// Chat receiving completion notices.
    pub green_api_chat_id: Option<String>,
    /// Seconds before a notification request is abandoned.
    pub notify_timeout_secs: Option<u64>,
}

/// Settings that cannot be turned into runtime values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("UTC offset of {minutes} minutes is out of range")]
    UtcOffset { minutes: i32 },
}

impl RosterSettings {
    /// Listening address, `0.0.0.0:8080` by default.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Photo directory, `uploads` by default.
    pub fn photo_dir(&self) -> PathBuf {
        self.photo_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PHOTO_DIR))
    }

    /// Offset in which week boundaries are judged.
    pub fn utc_offset(&self) -> Result<FixedOffset, SettingsError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(SettingsError::UtcOffset {
                minutes: self.utc_offset_minutes,
            })
    }

    /// Prefix for photo links; absolute when a public base URL is set.
    pub fn photo_base_url(&self) -> String {
        match self.public_base_url.as_deref() {
            Some(base) => format!("{}{PHOTO_ROUTE}", base.trim_end_matches('/')),
            None => PHOTO_ROUTE.to_owned(),
        }
    }

    /// Notification request timeout.
    pub fn notify_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.notify_timeout_secs
                .unwrap_or(DEFAULT_NOTIFY_TIMEOUT_SECS),
        )
    }

    /// Green API settings when instance, token and chat are all present.
    pub fn green_api(&self) -> Option<GreenApiConfig> {
        match (
            self.green_api_instance_id.as_deref(),
            self.green_api_token.as_deref(),
            self.green_api_chat_id.as_deref(),
        ) {
            (Some(instance), Some(token), Some(chat)) => {
                let mut config = GreenApiConfig::new(instance, token, chat);
                if let Some(api_base) = &self.green_api_url {
                    config.api_base.clone_from(api_base);
                }
                if self.public_base_url.is_none() {
                    warn!("ROSTER_PUBLIC_BASE_URL unset; chat photo links will be relative");
                }
                Some(config)
            }
            (None, None, None) => None,
            _ => {
                warn!("incomplete Green API settings; notifications disabled");
                None
            }
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Construct a server configuration from session settings.
    #[must_use]
    pub const fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "ROSTER_BIND_ADDR",
        "ROSTER_DATABASE_URL",
        "ROSTER_UTC_OFFSET_MINUTES",
        "ROSTER_SEED_ACCOUNTS",
        "ROSTER_PUBLIC_BASE_URL",
        "ROSTER_GREEN_API_INSTANCE_ID",
        "ROSTER_GREEN_API_TOKEN",
        "ROSTER_GREEN_API_CHAT_ID",
    ];

    fn load() -> RosterSettings {
        RosterSettings::load_from_iter([OsString::from("chore-roster")])
            .expect("settings should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
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
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(env_with(&[]));

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert!(!settings.seed_accounts);
        assert_eq!(settings.utc_offset().expect("offset").local_minus_utc(), 0);
        assert_eq!(settings.photo_base_url(), "/api/v1/photos");
        assert!(settings.green_api().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("ROSTER_BIND_ADDR", "127.0.0.1:9000"),
            ("ROSTER_UTC_OFFSET_MINUTES", "-300"),
            ("ROSTER_SEED_ACCOUNTS", "true"),
            ("ROSTER_PUBLIC_BASE_URL", "https://chores.example/"),
            ("ROSTER_GREEN_API_INSTANCE_ID", "1101"),
            ("ROSTER_GREEN_API_TOKEN", "token"),
            ("ROSTER_GREEN_API_CHAT_ID", "123@g.us"),
        ]));

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9000
        );
        assert!(settings.seed_accounts);
        assert_eq!(
            settings.utc_offset().expect("offset").local_minus_utc(),
            -300 * 60
        );
        assert_eq!(
            settings.photo_base_url(),
            "https://chores.example/api/v1/photos"
        );
        let green = settings.green_api().expect("green api");
        assert_eq!(green.chat_id, "123@g.us");
    }

    #[rstest]
    fn partial_green_api_settings_disable_notifications() {
        let _guard = lock_env(env_with(&[("ROSTER_GREEN_API_TOKEN", "token")]));

        assert!(load().green_api().is_none());
    }

    #[rstest]
    fn out_of_range_offset_is_rejected() {
        let _guard = lock_env(env_with(&[("ROSTER_UTC_OFFSET_MINUTES", "1500")]));

        assert!(matches!(
            load().utc_offset(),
            Err(SettingsError::UtcOffset { minutes: 1500 })
        ));
    }

    #[rstest]
    fn malformed_bind_address_is_rejected() {
        let _guard = lock_env(env_with(&[("ROSTER_BIND_ADDR", "nowhere")]));

        assert!(matches!(
            load().bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }
}

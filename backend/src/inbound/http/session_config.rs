//! Session cookie configuration read from the environment.
//!
//! Release builds insist on explicit, valid values and a real signing key.
//! Debug builds fall back to safe defaults and log a warning instead.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates defaults and warns about missing toggles.
    Debug,
    /// Requires explicit, valid toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn fallback<T>(self, value: T, error: SessionConfigError) -> Result<T, SessionConfigError> {
        match self {
            Self::Debug => {
                warn!(%error, "using default session setting");
                Ok(value)
            }
            Self::Release => Err(error),
        }
    }
}

/// Cookie-session settings for the middleware.
pub struct SessionSettings {
    /// Signing and encryption key for the cookie.
    pub key: Key,
    /// Whether the cookie is marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy of the cookie.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file is shorter than a release build accepts.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` without a secure cookie.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys would log everyone out on restart.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use media_backend::inbound::http::session_config::{
///     session_settings_from_env, BuildMode,
/// };
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_KEY_FILE" => Some("/nonexistent/session_key".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug)
///     .expect("debug builds fall back to defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_from_env(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = bool_from_env(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn bool_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return mode.fallback(default, SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => mode.fallback(
            default,
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        return mode.fallback(default, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => mode.fallback(SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => mode.fallback(
            default,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

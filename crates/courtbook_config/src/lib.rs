use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};
pub mod models;
pub use models::*;

/// Marker value replaced by an environment variable at load time.
pub const SECRET_FROM_ENV: &str = "secret_from_env";

/// Loads the layered application configuration.
///
/// Sources, later ones winning:
/// 1. `<config dir>/default.{toml,json,yaml}` (optional)
/// 2. `<config dir>/<RUN_ENV>.{toml,json,yaml}` (optional, `RUN_ENV` defaults to `debug`)
/// 3. Environment variables with prefix `COURTBOOK` and `__` as separator,
///    e.g. `COURTBOOK__SERVER__PORT=9000`.
///
/// The config dir is `COURTBOOK_CONFIG_DIR` or `./config`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "COURTBOOK".to_string());
    let config_dir =
        PathBuf::from(env::var("COURTBOOK_CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Replaces every `"secret_from_env"` string with the value of its env var.
///
/// The variable name is the key path joined with `_` and upper-cased, so
/// `backend.session_cookie` reads `BACKEND_SESSION_COOKIE`. A marker without a
/// matching variable becomes `null`, which optional fields read as unset.
fn resolve_secret_markers(value: &mut Value, path: &mut Vec<String>) {
    match value {
        Value::Object(fields) => {
            for (key, field) in fields.iter_mut() {
                path.push(key.to_uppercase());
                resolve_secret_markers(field, path);
                path.pop();
            }
        }
        Value::String(marker) if marker.as_str() == SECRET_FROM_ENV => {
            let var = path.join("_");
            *value = match env::var(&var) {
                Ok(secret) => Value::String(secret),
                Err(_) => {
                    warn!("{} is not set; leaving {} unset", var, path.join("."));
                    Value::Null
                }
            };
        }
        _ => {}
    }
}

/// Round-trips the config through JSON to resolve `secret_from_env` markers.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("config is not serializable: {err}")))?;
    resolve_secret_markers(&mut json, &mut Vec::new());
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("config after secret injection: {err}")))
}

static DOTENV_LOADED: OnceCell<String> = OnceCell::new();

/// Loads a dotenv file into the process environment, once.
///
/// The file is `DOTENV_OVERRIDE`, else a first command line argument starting
/// with `.env`, else `.env`. A missing file is fine. Returns the path used.
pub fn ensure_dotenv_loaded() -> String {
    DOTENV_LOADED
        .get_or_init(|| {
            let path = env::var("DOTENV_OVERRIDE")
                .ok()
                .or_else(|| env::args().nth(1).filter(|arg| arg.starts_with(".env")))
                .unwrap_or_else(|| ".env".to_string());
            if dotenv::from_filename(&path).is_err() {
                debug!("No dotenv file at {}", path);
            }
            path
        })
        .clone()
}

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod models;
pub use models::*;

/// Where configuration is read from.
///
/// Files are layered as `<config_dir>/default` then `<config_dir>/<run_env>`,
/// both optional and in any format the `config` crate recognises by extension.
/// Environment variables named `<PREFIX>_<SECTION>__<KEY>` override both.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub config_dir: PathBuf,
    pub run_env: String,
    pub prefix: String,
}

impl ConfigSources {
    /// Reads `CONFIG_DIR`, `RUN_ENV` and `PREFIX`, falling back to `config`, `debug` and `PMN`.
    pub fn from_env() -> Self {
        Self {
            config_dir: PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string())),
            run_env: env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string()),
            prefix: env::var("PREFIX").unwrap_or_else(|_| "PMN".to_string()),
        }
    }
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    load_config_with(&ConfigSources::from_env())
}

pub fn load_config_with(sources: &ConfigSources) -> Result<AppConfig, ConfigError> {
    let default_path = path_str(&sources.config_dir.join("default"))?;
    let env_path = path_str(&sources.config_dir.join(&sources.run_env))?;

    debug!(default_path = %default_path, env_path = %env_path, "Loading configuration");

    let builder = Config::builder()
        .add_source(File::with_name(&default_path).required(false))
        .add_source(File::with_name(&env_path).required(false))
        .add_source(
            Environment::with_prefix(&sources.prefix)
                .prefix_separator("_")
                .separator("__"),
        );

    builder.build()?.try_deserialize()
}

fn path_str(path: &Path) -> Result<String, ConfigError> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Message(format!("config path is not valid UTF-8: {}", path.display())))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file named by `DOTENV_OVERRIDE` wins, then the first command line argument
/// if it starts with `.env`, then `.env`. Loading happens once per process; a
/// missing file is not an error. Returns the path that was chosen.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

use std::{
    env::{self, VarError},
    str::FromStr,
};
use tracing::Level;

pub mod record;
pub mod routes;
pub mod sharing;

pub use routes::GetHealthcheckResponse;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_THRESHOLD: u32 = 1024;

// ############################################
// ################## CONFIG ##################
// ############################################

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: Level,
    /// Largest threshold accepted over HTTP, interpolation cost grows quadratically with it.
    /// This is the actual bound on the work: a request answered by the timeout layer keeps
    /// interpolating on the blocking pool until it completes.
    pub max_threshold: u32,
}

impl Config {
    pub fn parse_environment() -> Result<Config, anyhow::Error> {
        let mut errors: Vec<String> = vec![];
        let port = match parse_env_variable("PORT") {
            Ok(v) => v.unwrap_or(DEFAULT_PORT),
            Err(e) => {
                errors.push(e.to_string());
                DEFAULT_PORT
            }
        };
        // `LOG_LEVEL` has priority over `RUST_LOG`
        let log_level = match parse_log_level("LOG_LEVEL", "RUST_LOG") {
            Ok(v) => v,
            Err(e) => {
                errors.push(e.to_string());
                Level::INFO
            }
        };

        let max_threshold = match parse_max_threshold("MAX_THRESHOLD") {
            Ok(v) => v,
            Err(e) => {
                errors.push(e.to_string());
                DEFAULT_MAX_THRESHOLD
            }
        };

        if !errors.is_empty() {
            return Err(anyhow::anyhow!(errors.join(", ")));
        }

        Ok(Config {
            port,
            log_level,
            max_threshold,
        })
    }
}

// An invalid fallback is ignored, only the primary variable reports errors
fn parse_log_level(key: &str, fallback_key: &str) -> Result<Level, anyhow::Error> {
    let log_level = parse_env_variable::<Level>(key)?
        .or_else(|| parse_env_variable::<Level>(fallback_key).unwrap_or(None))
        .unwrap_or(Level::INFO);
    Ok(log_level)
}

fn parse_max_threshold(key: &str) -> Result<u32, anyhow::Error> {
    let max_threshold = parse_env_variable::<u32>(key)?.unwrap_or(DEFAULT_MAX_THRESHOLD);
    if max_threshold == 0 {
        return Err(anyhow::anyhow!("[{key}]: must be strictly positive"));
    }
    Ok(max_threshold)
}

fn parse_env_variable<T>(key: &str) -> Result<Option<T>, anyhow::Error>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    fn map_err<E>(key: &str, e: E) -> anyhow::Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        anyhow::anyhow!("[{key}]: {e}")
    }

    let env_value = match env::var(key) {
        Ok(v) => {
            if v.is_empty() {
                Ok(None)
            } else {
                Ok(Some(v))
            }
        }
        Err(e) => {
            if e == VarError::NotPresent {
                Ok(None)
            } else {
                Err(map_err(key, e))
            }
        }
    }?;
    env_value
        .map(|v| v.parse::<T>().map_err(|e| map_err(key, e)))
        .transpose()
}

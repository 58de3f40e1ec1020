use std::{env, fmt, fs, path::Path, time::Duration};

use crate::{errors::Error, i18n::Locale, Result};

pub const DEFAULT_NASA_API_BASE: &str = "https://api.nasa.gov";

/// Typed configuration, read from the process environment (and `.env`).
#[derive(Clone)]
pub struct Config {
    // Credentials
    pub telegram_bot_token: String,
    pub nasa_api_key: String,

    // NASA API
    pub nasa_api_base: String,
    pub http_timeout: Duration,

    // Presentation
    pub locale: Locale,

    // Telegram limits
    pub telegram_message_limit: usize,
    pub telegram_caption_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| get(key).and_then(non_empty);

        // Required credentials. `TELEGRAM_TOKEN` is the legacy name.
        let telegram_bot_token = var("TELEGRAM_BOT_TOKEN")
            .or_else(|| var("TELEGRAM_TOKEN"))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;
        let nasa_api_key = var("NASA_API_KEY").ok_or_else(|| {
            Error::Config("NASA_API_KEY environment variable is required".to_string())
        })?;

        let nasa_api_base = var("NASA_API_BASE")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_NASA_API_BASE.to_string());
        let http_timeout = Duration::from_secs(parse_u64(&var, "HTTP_TIMEOUT_SECS")?.unwrap_or(30));

        let locale = match var("BOT_LOCALE") {
            Some(s) => s.parse::<Locale>()?,
            None => Locale::default(),
        };

        let telegram_message_limit = parse_usize(&var, "TELEGRAM_MESSAGE_LIMIT")?.unwrap_or(4096);
        let telegram_caption_limit = parse_usize(&var, "TELEGRAM_CAPTION_LIMIT")?.unwrap_or(1024);

        Ok(Self {
            telegram_bot_token,
            nasa_api_key,
            nasa_api_base,
            http_timeout,
            locale,
            telegram_message_limit,
            telegram_caption_limit,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_bot_token", &"<redacted>")
            .field("nasa_api_key", &"<redacted>")
            .field("nasa_api_base", &self.nasa_api_base)
            .field("http_timeout", &self.http_timeout)
            .field("locale", &self.locale)
            .field("telegram_message_limit", &self.telegram_message_limit)
            .field("telegram_caption_limit", &self.telegram_caption_limit)
            .finish()
    }
}

fn parse_u64(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    var(key)
        .map(|s| {
            s.trim()
                .parse::<u64>()
                .map_err(|_| Error::Config(format!("{key} must be a non-negative integer")))
        })
        .transpose()
}

fn parse_usize(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<usize>> {
    Ok(parse_u64(var, key)?.map(|v| v as usize))
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }
        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

use std::{env, fs, path::Path};

use crate::{domain::UserId, errors::Error, Result};

/// Typed configuration for the relay bot.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    pub admin_id: UserId,

    // Quotas
    pub default_quota: u32,

    // Presentation
    pub summary_preview_chars: usize,
    pub list_preview_chars: usize,
    pub export_filename: String,

    // Liveness endpoint
    pub health_enabled: bool,
    pub health_port: u16,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required env vars
        let telegram_bot_token = env_str("BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let admin_id = parse_admin_id(env_str("ADMIN_ID"))?;

        let default_quota = env_u32("DEFAULT_QUOTA").unwrap_or(3);

        let summary_preview_chars = env_usize("SUMMARY_PREVIEW_CHARS").unwrap_or(100);
        let list_preview_chars = env_usize("LIST_PREVIEW_CHARS").unwrap_or(50);
        let export_filename = env_str("EXPORT_FILENAME")
            .and_then(non_empty)
            .unwrap_or_else(|| "messages.csv".to_string());

        let health_enabled = env_bool("HEALTH_ENABLED").unwrap_or(true);
        let health_port = env_str("PORT")
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(5000);

        Ok(Self {
            telegram_bot_token,
            admin_id,
            default_quota,
            summary_preview_chars,
            list_preview_chars,
            export_filename,
            health_enabled,
            health_port,
        })
    }
}

fn parse_admin_id(raw: Option<String>) -> Result<UserId> {
    let raw = raw.and_then(non_empty).ok_or_else(|| {
        Error::Config("ADMIN_ID environment variable is required".to_string())
    })?;
    raw.trim()
        .parse::<i64>()
        .map(UserId)
        .map_err(|_| Error::Config(format!("ADMIN_ID must be an integer, got {raw:?}")))
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
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

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| parse_bool(&s))
}

fn env_u32(key: &str) -> Option<u32> {
    env_str(key).and_then(|s| s.trim().parse::<u32>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

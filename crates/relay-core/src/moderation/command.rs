use crate::{domain::UserId, errors::Error, Result};

pub const LIMIT_USAGE: &str = "Usage: /limit [user_id] <count>";

/// Text commands understood by the bot.
///
/// Only `Start` is open to senders; everything else is operator-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    ListSaved,
    Export,
    Stats,
    SetQuota { target: Option<UserId>, value: u32 },
    ListQuotas,
    Help,
}

impl Command {
    /// Parse a `/command args` message.
    ///
    /// `Ok(None)` means "not one of ours" (plain text or an unknown command).
    /// Bad `/limit` arguments are a usage error.
    pub fn parse(text: &str) -> Result<Option<Self>> {
        if !text.trim_start().starts_with('/') {
            return Ok(None);
        }
        let (cmd, args) = split_command(text);

        let parsed = match cmd.as_str() {
            "start" => Self::Start,
            "saved" => Self::ListSaved,
            "download" => Self::Export,
            "stats" => Self::Stats,
            "limits" => Self::ListQuotas,
            "help" => Self::Help,
            "limit" => parse_limit(&args)?,
            _ => return Ok(None),
        };
        Ok(Some(parsed))
    }

    pub fn is_operator_only(&self) -> bool {
        !matches!(self, Self::Start)
    }
}

fn split_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_string();

    (cmd, rest)
}

fn parse_limit(args: &str) -> Result<Command> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let number_err = || Error::Usage("Error: use whole non-negative numbers".to_string());

    match parts.as_slice() {
        [value] => Ok(Command::SetQuota {
            target: None,
            value: value.parse().map_err(|_| number_err())?,
        }),
        [user, value] => Ok(Command::SetQuota {
            target: Some(UserId(user.parse().map_err(|_| number_err())?)),
            value: value.parse().map_err(|_| number_err())?,
        }),
        _ => Err(Error::Usage(LIMIT_USAGE.to_string())),
    }
}

//! Runtime configuration
//!
//! Everything is read from the environment once per invocation:
//!
//! - `GITLET_DATE`: fixed timestamp for new commits, either RFC 2822 or
//!   `%Y-%m-%d %H:%M:%S %z`
//! - `NO_PAGER`: when set, long output is never sent through the pager

use chrono::{DateTime, FixedOffset};

pub const DATE_ENV: &str = "GITLET_DATE";
pub const NO_PAGER_ENV: &str = "NO_PAGER";
pub const LOG_ENV: &str = "GITLET_LOG";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    date_override: Option<DateTime<FixedOffset>>,
    pager_disabled: bool,
}

impl Config {
    pub fn new(date_override: Option<DateTime<FixedOffset>>, pager_disabled: bool) -> Self {
        Config {
            date_override,
            pager_disabled,
        }
    }

    pub fn load_from_env() -> anyhow::Result<Self> {
        let date_override = match std::env::var(DATE_ENV) {
            Ok(date_str) => Some(Self::parse_date(&date_str)?),
            Err(_) => None,
        };
        let pager_disabled = std::env::var_os(NO_PAGER_ENV).is_some();

        Ok(Config::new(date_override, pager_disabled))
    }

    fn parse_date(date_str: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc2822(date_str)
            .or_else(|_| DateTime::parse_from_str(date_str, DATE_FORMAT))
            .map_err(|_| anyhow::anyhow!("{DATE_ENV} is not a valid date: {date_str}"))
    }

    /// Timestamp for a commit created now
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.date_override
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    pub fn pager_disabled(&self) -> bool {
        self.pager_disabled
    }
}

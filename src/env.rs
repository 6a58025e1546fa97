use irc::client::prelude::Config;
use std::time::Duration;

use crate::error::*;

#[inline]
pub fn load() -> Outcome<()> {
    match dotenv::dotenv() {
        Ok(_)                     => Ok(()),
        Err(dotenv::Error::Io(_)) => Ok(()),
        Err(e)                    => Err(Error::throw(format!("Error loading .env: {}", e)))
    }
}

#[inline]
pub fn get(var: &str) -> Outcome<String> {
    opt(var).ok_or_else(||
        Error::throw(format!("{} must be defined in .env or as an environment variable", var))
    )
}

#[inline]
pub fn opt(var: &str) -> Option<String> {
    let res = std::env::var(var).ok()?.trim().to_owned();
    if res.is_empty() { None } else { Some(res) }
}

fn flag(var: &str) -> bool {
    match opt(var) {
        None    => false,
        Some(s) => ["1", "true", "yes", "on"].contains(&s.to_lowercase().as_str())
    }
}

/// A wiki to create on startup if the database doesn't have it yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub name:         String,
    pub api:          String,
    pub article_path: String
}

impl SiteSettings {
    fn load() -> Outcome<Option<Self>> {
        let api = match opt("WIKI_API") {
            None    => return Ok(None),
            Some(x) => x
        };
        Ok(Some(Self {
            name:         opt("WIKI_NAME").unwrap_or_else(|| "wiki".to_owned()),
            article_path: get("WIKI_ARTICLE_PATH")?,
            api
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub nick:          String,
    pub trigger:       String,
    pub database:      String,
    pub debug_channel: Option<String>,
    pub owner:         Option<String>,
    pub shortener:     Option<String>,
    pub user_agent:    String,
    pub join_timeout:  Duration,
    pub site:          Option<SiteSettings>
}

impl Settings {
    pub fn load() -> Outcome<Self> {
        let join_timeout = match opt("JOIN_TIMEOUT") {
            None    => Duration::from_secs(30),
            Some(s) => humantime::parse_duration(&s)?
        };
        Ok(Self {
            nick:          get("IRC_NICK")?,
            trigger:       opt("TRIGGER").unwrap_or_else(|| "!".to_owned()),
            database:      opt("DATABASE_URL").unwrap_or_else(|| "wikihelp.db".to_owned()),
            debug_channel: opt("DEBUG_CHANNEL"),
            owner:         opt("OWNER"),
            shortener:     opt("SHORTENER_URL"),
            user_agent:    opt("USER_AGENT").unwrap_or_else(||
                format!("wikihelp/{}", env!("CARGO_PKG_VERSION"))
            ),
            join_timeout,
            site:          SiteSettings::load()?
        })
    }
}

pub fn irc() -> Outcome<Config> {
    Ok(Config {
        server:   Some(get("IRC_SERVER")?),
        nickname: Some(get("IRC_NICK")?),
        password: opt("IRC_PASSWORD"),
        port:     match opt("IRC_PORT") {
            None    => None,
            Some(p) => Some(p.parse()?)
        },
        use_tls:  Some(flag("IRC_TLS")),
        channels: opt("AUTOJOIN")
            .map(|x| x.split(',').map(|c| format!("#{}", c.trim_start_matches('#'))).collect())
            .unwrap_or_default(),
        ..Config::default()
    })
}

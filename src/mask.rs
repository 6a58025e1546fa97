use regex::{Regex, RegexBuilder};
use std::fmt;

use crate::error::*;

pub const ANY: &str = "*";

/// The parts of a user's identity that access rules match against.
/// Absent parts match as the literal `*`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Identity<'a> {
    pub nick:    Option<&'a str>,
    pub user:    Option<&'a str>,
    pub host:    Option<&'a str>,
    pub account: Option<&'a str>
}

/// A single `*`-wildcarded, case-insensitive pattern compiled to an anchored regex.
#[derive(Debug, Clone)]
pub struct Mask {
    pattern: String,
    regex:   Regex
}

impl Mask {
    pub fn new(pattern: &str) -> Outcome<Self> {
        let body: Vec<String> = pattern.split('*').map(regex::escape).collect();
        let regex = RegexBuilder::new(&format!("^{}$", body.join(".*")))
            .case_insensitive(true)
            .build()?;
        Ok(Self { pattern: pattern.to_owned(), regex })
    }

    pub fn is_match(&self, value: Option<&str>) -> bool {
        self.regex.is_match(value.unwrap_or(ANY))
    }
}

impl PartialEq for Mask {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.eq_ignore_ascii_case(&other.pattern)
    }
}

/// The four-part user mask of an access rule: `nick!user@host` plus account.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMask {
    pub nick:    Mask,
    pub user:    Mask,
    pub host:    Mask,
    pub account: Mask
}

impl UserMask {
    pub fn new(nick: &str, user: &str, host: &str, account: &str) -> Outcome<Self> {
        Ok(Self {
            nick:    Mask::new(nick)?,
            user:    Mask::new(user)?,
            host:    Mask::new(host)?,
            account: Mask::new(account)?
        })
    }

    pub fn matches(&self, id: &Identity) -> bool {
        self.account.is_match(id.account)
            && self.nick.is_match(id.nick)
            && self.user.is_match(id.user)
            && self.host.is_match(id.host)
    }
}

/// A mask as typed by an administrator, before compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hostmask {
    pub nick:    String,
    pub user:    String,
    pub host:    String,
    pub account: String
}

impl Hostmask {
    /// Accepts `nick!user@host`, `$a:account`, or a bare nickname.
    pub fn parse(s: &str) -> Option<Self> {
        let any = || ANY.to_owned();
        if let Some(account) = s.strip_prefix("$a:") {
            if account.is_empty() || account.contains(' ') {
                return None
            }
            return Some(Self { nick: any(), user: any(), host: any(), account: account.to_owned() })
        }
        lazy_static! {
            static ref FULL: Regex = Regex::new(r"^([^!@\s]+)!([^!@\s]+)@([^!@\s]+)$")
                .expect("hostmask pattern");
            static ref NICK: Regex = Regex::new(r"^[^!@\s#$]+$").expect("nickname pattern");
        }
        if let Some(caps) = FULL.captures(s) {
            Some(Self {
                nick:    caps[1].to_owned(),
                user:    caps[2].to_owned(),
                host:    caps[3].to_owned(),
                account: any()
            })
        } else if NICK.is_match(s) {
            Some(Self { nick: s.to_owned(), user: any(), host: any(), account: any() })
        } else {
            None
        }
    }

    pub fn compile(&self) -> Outcome<UserMask> {
        UserMask::new(&self.nick, &self.user, &self.host, &self.account)
    }
}

impl fmt::Display for Hostmask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}!{}@{}", self.nick, self.user, self.host)?;
        if self.account != ANY {
            write!(f, " ($a:{})", self.account)?;
        }
        Ok(())
    }
}

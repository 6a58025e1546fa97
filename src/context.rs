use irc::client::prelude::*;
use irc::proto::message::Tag;
use std::fmt;
use std::time::Instant;

use crate::mask::{ANY, Hostmask, Identity};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Context {
    pub channel: String,
    pub nick:    String,
    pub user:    Option<String>,
    pub host:    Option<String>,
    pub account: Option<String>,
    pub time:    Instant
}

impl Context {
    pub fn build(message: &Message) -> Option<Context> {
        let channel = message.response_target()?.to_lowercase();
        let (nick, user, host) = match message.prefix.as_ref()? {
            Prefix::Nickname(nick, user, host) => (nick.to_owned(), nonempty(user), nonempty(host)),
            Prefix::ServerName(_)              => return None
        };
        let account = message.tags.as_ref().and_then(|tags| tags
            .iter()
            .find(|Tag(k, _)| k == "account")
            .and_then(|Tag(_, v)| v.to_owned())
        );
        Some(Self { channel, nick, user, host, account, time: Instant::now() })
    }

    /// Someone at the console, posing as the given mask.
    pub fn local(channel: &str, mask: Option<&Hostmask>) -> Self {
        let part = |x: &str| if x == ANY { None } else { Some(x.to_owned()) };
        Self {
            channel: channel.to_lowercase(),
            nick:    mask.and_then(|m| part(&m.nick)).unwrap_or_else(|| "console".to_owned()),
            user:    mask.and_then(|m| part(&m.user)),
            host:    mask.and_then(|m| part(&m.host)),
            account: mask.and_then(|m| part(&m.account)),
            time:    Instant::now()
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            nick:    Some(&self.nick),
            user:    self.user.as_deref(),
            host:    self.host.as_deref(),
            account: self.account.as_deref()
        }
    }

    pub fn is_channel(&self) -> bool {
        self.channel.starts_with('#')
    }

    pub fn since(&self) -> String {
        let dur = self.time.elapsed();
        format!("{}.{:02}s ", dur.as_secs(), dur.subsec_millis() / 10)
    }

    #[cfg(test)]
    pub fn mock(channel: &str, nick: &str) -> Self {
        Context {
            channel: channel.to_lowercase(),
            nick:    nick.to_owned(),
            user:    Some(nick.to_lowercase()),
            host:    Some("example.org".to_owned()),
            account: None,
            time:    Instant::now()
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "{}!{}@{}",
            self.nick,
            self.user.as_deref().unwrap_or("*"),
            self.host.as_deref().unwrap_or("*")
        )?;
        if let Some(account) = &self.account {
            write!(f, " ($a:{})", account)?;
        }
        Ok(())
    }
}

fn nonempty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_owned()) }
}

use irc::client::Sender;

use crate::error::*;
use crate::logging::clean;

pub trait Output: Send + Sync {
    fn msg(&self, target: &str, text: &str) -> Outcome<()>;
    fn notice(&self, target: &str, text: &str) -> Outcome<()>;
    fn action(&self, target: &str, text: &str) -> Outcome<()>;
    fn join(&self, channel: &str) -> Outcome<()>;
    fn quit(&self, text: &str) -> Outcome<()>;
}

pub struct IrcOutput(pub Sender);

impl Output for IrcOutput {
    fn msg(&self, target: &str, text: &str) -> Outcome<()> {
        tracing::info!("> {} | {}", target, clean(text));
        Ok(self.0.send_privmsg(target, text)?)
    }
    fn notice(&self, target: &str, text: &str) -> Outcome<()> {
        tracing::info!("> {} - {}", target, clean(text));
        Ok(self.0.send_notice(target, text)?)
    }
    fn action(&self, target: &str, text: &str) -> Outcome<()> {
        tracing::info!("> {} * {}", target, clean(text));
        Ok(self.0.send_action(target, text)?)
    }
    fn join(&self, channel: &str) -> Outcome<()> {
        tracing::info!("Joining {}", channel);
        Ok(self.0.send_join(channel)?)
    }
    fn quit(&self, text: &str) -> Outcome<()> {
        tracing::warn!("Quitting: {}", text);
        Ok(self.0.send_quit(text)?)
    }
}

/// Console output for `--offline`.
pub struct Offline;

impl Output for Offline {
    fn msg(&self, target: &str, text: &str) -> Outcome<()> {
        println!("{} | {}", target, clean(text));
        Ok(())
    }
    fn notice(&self, target: &str, text: &str) -> Outcome<()> {
        println!("{} - {}", target, clean(text));
        Ok(())
    }
    fn action(&self, target: &str, text: &str) -> Outcome<()> {
        println!("{} * {}", target, clean(text));
        Ok(())
    }
    fn join(&self, channel: &str) -> Outcome<()> {
        println!("(joining {})", channel);
        Ok(())
    }
    fn quit(&self, text: &str) -> Outcome<()> {
        println!("(quit: {})", text);
        Ok(())
    }
}

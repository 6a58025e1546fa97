use std::sync::Arc;

mod access;
mod alias;
mod basewiki;
mod die;
mod editcount;
mod fetchall;
mod flaggroup;
pub mod force;
mod help;
mod ignore;
mod join;
mod keyword;
mod silence;
mod site;
mod watcher;

use crate::bot::Bot;
use crate::context::Context;
use crate::db;
use crate::error::*;
use crate::flags;
use crate::registry::Registry;
use crate::util::{self, own};

pub use self::Response::*;

/// What a command sends back. Everything but `Private` follows a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Addressed to the invoker.
    Reply(String),
    Message(String),
    Action(String),
    /// A notice to the invoker alone.
    Private(String)
}

impl Response {
    pub fn text(&self) -> &str {
        match self {
            Reply(s) | Message(s) | Action(s) | Private(s) => s
        }
    }
}

pub trait Command: Send + Sync {
    fn cmds(&self) -> Vec<String>;
    fn usage(&self) -> String;
    /// The flag an invoker needs.
    fn flag(&self) -> char { flags::STANDARD }
    /// The fewest arguments the command accepts.
    fn arity(&self) -> usize { 0 }
    fn run(&self, args: &[&str], ctx: &Context, bot: &Bot) -> Outcome<Vec<Response>>;

    #[cfg(test)]
    fn test(&self, query: &str, ctx: &Context, bot: &Bot) -> Outcome<String> {
        let args: Vec<&str> = query.split(' ').filter(|x| !x.is_empty()).collect();
        let res = self.run(&args, ctx, bot)?;
        let lines: Vec<&str> = res.iter().map(Response::text).collect();
        Ok(lines.join("\n"))
    }
}

pub fn register_all(registry: &mut Registry) {
    let commands: Vec<Arc<dyn Command>> = vec![
        Arc::new(access::Access),
        Arc::new(alias::CommandAlias),
        Arc::new(basewiki::BaseWiki),
        Arc::new(die::Die),
        Arc::new(editcount::EditCount),
        Arc::new(fetchall::FetchAll),
        Arc::new(flaggroup::FlagGroup),
        Arc::new(help::Help),
        Arc::new(ignore::Ignore),
        Arc::new(join::Join),
        Arc::new(keyword::Keyword),
        Arc::new(silence::Silence),
        Arc::new(site::Site),
        Arc::new(watcher::CategoryWatcher)
    ];
    for command in commands {
        registry.register(None, command);
    }
}

fn require_channel(ctx: &Context) -> Outcome<()> {
    if ctx.is_channel() {
        Ok(())
    } else {
        Err(Error::failed("That only works in a channel."))
    }
}

fn parse_switch(s: &str) -> Outcome<bool> {
    match s.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1"  => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _                            => Err(InvalidArgs)
    }
}

/// Removes a `--flag` from the arguments, reporting whether it was there.
fn take_flag<'a>(args: &[&'a str], flag: &str) -> (Vec<&'a str>, bool) {
    let found = args.iter().any(|x| x.eq_ignore_ascii_case(flag));
    (args.iter().filter(|x| !x.eq_ignore_ascii_case(flag)).cloned().collect(), found)
}

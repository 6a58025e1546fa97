#[macro_use]
extern crate diesel;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;

#[macro_use]
mod logging;

pub mod background;
pub mod bot;
pub mod command;
pub mod context;
pub mod db;
pub mod env;
pub mod error;
pub mod events;
pub mod flags;
pub mod handler;
pub mod mask;
pub mod output;
pub mod parser;
pub mod registry;
pub mod shortener;
pub mod util;
pub mod wiki;

#[cfg(test)]
mod testing;

use futures_util::StreamExt;
use irc::client::prelude::{Capability, Client, Command, Message};
use std::io::BufRead;
use std::sync::Arc;

use self::bot::Bot;
use self::context::Context;
use self::db::Db;
use self::env::Settings;
use self::error::*;
use self::events::{ERR_NOMOTD, RPL_ENDOFMOTD};
use self::logging::*;
use self::mask::Hostmask;
use self::output::{IrcOutput, Offline, Output};
use self::shortener::{HttpShortener, Shortener};
use self::wiki::{MediaWikiApi, Wiki};

pub fn load() {
    if let Err(e) = env::load() {
        eprintln!("{}", e);
    }
    logging::init();
}

/// The blocking HTTP clients have to exist before the async runtime does.
fn services(settings: &Settings) -> Outcome<(Db, Box<dyn Wiki>, Box<dyn Shortener>)> {
    let db = Db::open(&settings.database)?;
    let wiki = MediaWikiApi::new(&settings.user_agent)?;
    let shortener: Box<dyn Shortener> = match &settings.shortener {
        None         => Box::new(shortener::Identity),
        Some(prefix) => Box::new(HttpShortener::new(prefix, &settings.user_agent)?)
    };
    Ok((db, Box::new(wiki), shortener))
}

pub fn run() -> Outcome<()> {
    let settings = Settings::load()?;
    let config = env::irc()?;
    let (db, wiki, shortener) = services(&settings)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let mut client = Client::from_config(config).await?;
        client.send_cap_req(&[Capability::AccountTag])?;
        client.identify()?;
        let irc: Arc<dyn Output> = Arc::new(IrcOutput(client.sender()));
        let bot = Arc::new(Bot::new(&settings, db, wiki, shortener, irc)?);
        background::spawn(bot.clone())?;

        let mut stream = client.stream()?;
        while let Some(message) = stream.next().await.transpose()? {
            observe(&bot, &message);
            if let Command::PRIVMSG(_, text) = &message.command {
                if let Some(ctx) = Context::build(&message) {
                    let bot = bot.clone();
                    let text = text.to_owned();
                    tokio::task::spawn_blocking(move || handler::handle(&bot, &ctx, &text).log(location!()));
                }
            }
            if bot.exit.is_set() {
                break
            }
        }
        bot.shutdown();
        Ok::<_, Error>(())
    })
}

/// Feeds server replies to whatever is waiting on them.
fn observe(bot: &Arc<Bot>, message: &Message) {
    match &message.command {
        Command::JOIN(chan, _, _) => {
            if let Some(nick) = message.source_nickname() {
                bot.joins.observe_join(chan, nick);
            }
        },
        Command::Response(code, params) => numeric(bot, *code as u16, params),
        Command::Raw(code, params) => {
            if let Ok(code) = code.parse() {
                numeric(bot, code, params);
            }
        },
        _ => ()
    }
}

fn numeric(bot: &Arc<Bot>, code: u16, params: &[String]) {
    if code == RPL_ENDOFMOTD || code == ERR_NOMOTD {
        if !bot.registered.is_set() {
            bot.registered.set();
            let bot = bot.clone();
            tokio::task::spawn_blocking(move || rejoin(&bot).log(location!()));
        }
        return
    }
    bot.joins.observe_numeric(code, params);
}

/// Joins every enabled channel once the server has accepted us.
fn rejoin(bot: &Bot) -> Outcome<()> {
    for chan in bot.db.read(db::channel::all)? {
        if chan.enabled {
            bot.irc.join(&chan.name)?;
        }
    }
    Ok(())
}

/// Reads commands from stdin as the owner and prints what the bot would send.
pub fn offline() -> Outcome<()> {
    let settings = Settings::load()?;
    let (db, wiki, shortener) = services(&settings)?;
    let bot = Arc::new(Bot::new(&settings, db, wiki, shortener, Arc::new(Offline))?);
    let owner = settings.owner.as_deref().and_then(Hostmask::parse);
    let ctx = Context::local("#console", owner.as_ref());
    bot.registered.set();
    background::spawn(bot.clone())?;
    for line in std::io::stdin().lock().lines() {
        handler::handle(&bot, &Context { time: std::time::Instant::now(), ..ctx.clone() }, &line?)
            .log(location!());
        if bot.exit.is_set() {
            break
        }
    }
    bot.shutdown();
    Ok(())
}

use parking_lot::{Condvar, Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;

use crate::background::{self, Watchers};
use crate::command;
use crate::db::{self, Db, NewSite};
use crate::env::Settings;
use crate::error::*;
use crate::events::Joins;
use crate::flags::Flags;
use crate::output::Output;
use crate::parser::Parser;
use crate::registry::Registry;
use crate::shortener::Shortener;
use crate::wiki::Wiki;

/// A one-way flag that threads can block on.
#[derive(Default)]
pub struct Latch {
    set:  Mutex<bool>,
    cond: Condvar
}

impl Latch {
    pub fn set(&self) {
        *self.set.lock() = true;
        self.cond.notify_all();
    }

    pub fn is_set(&self) -> bool {
        *self.set.lock()
    }

    /// Whether the latch was set before the timeout ran out.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let mut set = self.set.lock();
        if !*set {
            self.cond.wait_for(&mut set, timeout);
        }
        *set
    }
}

/// Every service the dispatcher, the commands and the watcher loop share.
pub struct Bot {
    pub nick:          String,
    pub trigger:       String,
    pub owner:         Option<String>,
    pub debug_channel: Option<String>,
    pub join_timeout:  Duration,
    pub parser:        Parser,
    pub db:            Db,
    pub flags:         Flags,
    pub registry:      RwLock<Registry>,
    pub watchers:      Watchers,
    pub joins:         Joins,
    pub wiki:          Box<dyn Wiki>,
    pub shortener:     Box<dyn Shortener>,
    pub irc:           Arc<dyn Output>,
    pub exit:          Latch,
    pub registered:    Latch
}

impl Bot {
    pub fn new(
        settings: &Settings,
        db: Db,
        wiki: Box<dyn Wiki>,
        shortener: Box<dyn Shortener>,
        irc: Arc<dyn Output>
    ) -> Outcome<Self> {
        let mut registry = Registry::new();
        command::register_all(&mut registry);
        let bot = Self {
            nick:          settings.nick.to_owned(),
            trigger:       settings.trigger.to_owned(),
            owner:         settings.owner.to_owned(),
            debug_channel: settings.debug_channel.to_owned(),
            join_timeout:  settings.join_timeout,
            parser:        Parser::new(&settings.trigger, &settings.nick)?,
            flags:         Flags::new(db.clone()),
            registry:      RwLock::new(registry),
            watchers:      Watchers::new(),
            joins:         Joins::new(),
            exit:          Latch::default(),
            registered:    Latch::default(),
            db,
            wiki,
            shortener,
            irc
        };
        if let Some(owner) = &bot.owner {
            if bot.db.transaction(|conn| db::access::bootstrap_owner(conn, owner))? {
                tracing::info!("Added {} to the owner group.", owner);
            }
        }
        if let Some(site) = &settings.site {
            let added = bot.db.transaction(|conn| db::site::ensure(conn, &NewSite {
                name:         &site.name,
                api:          &site.api,
                article_path: &site.article_path,
                username:     None,
                password:     None
            }))?;
            if added {
                tracing::info!("Added the wiki {} at {}.", site.name, site.api);
            }
        }
        let watchers = background::load(&bot)?;
        let aliases = bot.load_aliases()?;
        tracing::info!("Loaded {} watchers and {} aliases.", watchers, aliases);
        Ok(bot)
    }

    /// Registers stored aliases. Must run after the watchers' commands exist.
    fn load_aliases(&self) -> Outcome<usize> {
        let mut loaded = 0;
        let mut registry = self.registry.write();
        for alias in self.db.read(db::alias::all)? {
            match registry.add_alias(alias.channel.as_deref(), &alias.invocation, alias.target.as_deref()) {
                Ok(())  => loaded += 1,
                Err(e)  => tracing::warn!("Skipping alias {}: {}", alias.invocation, e)
            }
        }
        Ok(loaded)
    }

    pub fn shutdown(&self) {
        self.exit.set();
        self.watchers.notify();
    }
}

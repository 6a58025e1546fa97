//! Fixtures shared by the unit tests.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use hashbrown::HashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use crate::bot::Bot;
use crate::context::Context;
use crate::db::{self, Db, NewSite, NewWatcher, Site, Watcher};
use crate::env::Settings;
use crate::error::*;
use crate::output::Output;
use crate::shortener;
use crate::wiki::Wiki;

pub const NICK: &str = "HelpBot";
pub const OWNER: &str = "Owner!*@*";
pub const DEBUG_CHANNEL: &str = "#helpbot-debug";
pub const CHANNEL: &str = "#wikipedia-en-help";
pub const KEYWORD: &str = "afc";
pub const CATEGORY: &str = "Pending AfC submissions";
pub const EDITOR: &str = "SomeUser";

pub fn db() -> (Db, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Db::with_size(path.to_str().unwrap(), 4).unwrap();
    (db, dir)
}

pub fn time(minutes: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn site() -> Site {
    Site {
        id:           1,
        name:         "enwiki".to_owned(),
        api:          "https://en.wikipedia.org/w/api.php".to_owned(),
        article_path: "https://en.wikipedia.org/wiki/$1".to_owned(),
        username:     None,
        password:     None
    }
}

pub fn watcher() -> Watcher {
    Watcher {
        id:             1,
        channel_id:     1,
        site_id:        1,
        keyword:        KEYWORD.to_owned(),
        category:       CATEGORY.to_owned(),
        sleep_time:     20,
        enabled:        true,
        show_link:      true,
        show_short_url: false,
        show_wait_time: true,
        delta:          false,
        singular:       "item".to_owned(),
        plural:         "items".to_owned(),
        action:         "in {0}".to_owned(),
        min_wait_time:  0,
        priority:       0
    }
}

/// Adds a site, `CHANNEL` on it, and a disabled `KEYWORD` watcher there. Returns the channel and site ids.
pub fn seed(db: &Db) -> (i32, i32) {
    let seeded = site();
    db.transaction(|conn| {
        let site = db::site::add(conn, &NewSite {
            name:         &seeded.name,
            api:          &seeded.api,
            article_path: &seeded.article_path,
            username:     None,
            password:     None
        })?;
        let mut chan = db::channel::ensure(conn, CHANNEL)?;
        chan.enabled = true;
        chan.base_wiki_id = Some(site.id);
        db::channel::save(conn, &chan)?;
        db::watcher::add(conn, &NewWatcher {
            channel_id: chan.id,
            site_id:    site.id,
            keyword:    KEYWORD,
            category:   CATEGORY
        })?;
        Ok((chan.id, site.id))
    }).unwrap()
}

pub fn owner() -> Context {
    Context::mock("#help", "Owner")
}

pub fn settings(dir: &TempDir) -> Settings {
    Settings {
        nick:          NICK.to_owned(),
        trigger:       "!".to_owned(),
        database:      dir.path().join("test.db").to_string_lossy().into_owned(),
        debug_channel: Some(DEBUG_CHANNEL.to_owned()),
        owner:         Some(OWNER.to_owned()),
        shortener:     None,
        user_agent:    "wikihelp-tests".to_owned(),
        join_timeout:  std::time::Duration::from_millis(200),
        site:          None
    }
}

/// A wiki whose category holds whatever the test says.
#[derive(Default)]
pub struct MockWiki {
    pages: Mutex<Vec<String>>,
    fail:  AtomicBool
}

impl MockWiki {
    pub fn set_pages(&self, pages: &[&str]) {
        *self.pages.lock() = pages.iter().map(|x| (*x).to_owned()).collect();
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Outcome<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(Api(failure::err_msg("the wiki is down")))
        } else {
            Ok(())
        }
    }
}

impl Wiki for Arc<MockWiki> {
    fn pages_in_category(&self, _: &Site, _: &str) -> Outcome<Vec<String>> {
        self.check()?;
        Ok(self.pages.lock().clone())
    }

    fn touched(&self, _: &Site, titles: &[String]) -> Outcome<HashMap<String, NaiveDateTime>> {
        self.check()?;
        let then = Utc::now().naive_utc() - Duration::hours(1);
        Ok(titles.iter().map(|title| (title.to_owned(), then)).collect())
    }

    fn category_size(&self, _: &Site, _: &str) -> Outcome<i64> {
        self.check()?;
        Ok(self.pages.lock().len() as i64)
    }

    fn edit_count(&self, _: &Site, user: &str) -> Outcome<Option<i64>> {
        self.check()?;
        Ok(if user == EDITOR { Some(500) } else { None })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Msg(String, String),
    Notice(String, String),
    Action(String, String),
    Join(String),
    Quit(String)
}

/// An `Output` that remembers everything instead of sending it.
#[derive(Default)]
pub struct Recorder {
    log: Mutex<Vec<Sent>>
}

impl Recorder {
    fn push(&self, sent: Sent) -> Outcome<()> {
        self.log.lock().push(sent);
        Ok(())
    }
}

impl Output for Recorder {
    fn msg(&self, target: &str, text: &str) -> Outcome<()> {
        self.push(Sent::Msg(target.to_owned(), text.to_owned()))
    }
    fn notice(&self, target: &str, text: &str) -> Outcome<()> {
        self.push(Sent::Notice(target.to_owned(), text.to_owned()))
    }
    fn action(&self, target: &str, text: &str) -> Outcome<()> {
        self.push(Sent::Action(target.to_owned(), text.to_owned()))
    }
    fn join(&self, channel: &str) -> Outcome<()> {
        self.push(Sent::Join(channel.to_owned()))
    }
    fn quit(&self, text: &str) -> Outcome<()> {
        self.push(Sent::Quit(text.to_owned()))
    }
}

pub struct Fixture {
    pub wiki: Arc<MockWiki>,
    pub out:  Arc<Recorder>,
    settings: Settings,
    _dir:     TempDir
}

impl Fixture {
    fn log(&self) -> Vec<Sent> {
        self.out.log.lock().clone()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.log().into_iter().filter_map(|x| match x {
            Sent::Msg(target, text) => Some((target, text)),
            _                       => None
        }).collect()
    }

    pub fn notices(&self) -> Vec<(String, String)> {
        self.log().into_iter().filter_map(|x| match x {
            Sent::Notice(target, text) => Some((target, text)),
            _                          => None
        }).collect()
    }

    pub fn actions(&self) -> Vec<(String, String)> {
        self.log().into_iter().filter_map(|x| match x {
            Sent::Action(target, text) => Some((target, text)),
            _                          => None
        }).collect()
    }

    pub fn joins(&self) -> Vec<String> {
        self.log().into_iter().filter_map(|x| match x {
            Sent::Join(channel) => Some(channel),
            _                   => None
        }).collect()
    }

    pub fn quits(&self) -> Vec<String> {
        self.log().into_iter().filter_map(|x| match x {
            Sent::Quit(text) => Some(text),
            _                => None
        }).collect()
    }

    /// A fresh bot over the same database, as after a restart.
    pub fn restart(&self, bot: &Bot) -> Bot {
        build(&self.settings, bot.db.clone(), &self.wiki, &self.out)
    }

    pub fn restart_with<F: FnOnce(&mut Settings)>(&self, bot: &Bot, f: F) -> Bot {
        let mut settings = self.settings.clone();
        f(&mut settings);
        build(&settings, bot.db.clone(), &self.wiki, &self.out)
    }
}

fn build(settings: &Settings, db: Db, wiki: &Arc<MockWiki>, out: &Arc<Recorder>) -> Bot {
    let irc: Arc<dyn Output> = out.clone();
    Bot::new(settings, db, Box::new(wiki.clone()), Box::new(shortener::Identity), irc).unwrap()
}

pub fn bot() -> (Bot, Fixture) {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir);
    let db = Db::with_size(&settings.database, 4).unwrap();
    let wiki = Arc::new(MockWiki::default());
    let out = Arc::new(Recorder::default());
    let bot = build(&settings, db, &wiki, &out);
    (bot, Fixture { wiki, out, settings, _dir: dir })
}

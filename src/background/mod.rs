use chrono::NaiveDateTime;
use hashbrown::HashMap;
use parking_lot::{Condvar, Mutex};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::bot::Bot;
use crate::command::force::Force;
use crate::db::{self, Watcher};
use crate::error::*;
use crate::logging::*;

pub mod diff;
pub mod report;
pub mod update;

use self::update::now;

const IDLE: Duration = Duration::from_secs(5);
const MIN_SLICE: Duration = Duration::from_millis(250);
const MAX_SLICE: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Active {
    pub id:         i32,
    pub channel:    String,
    pub keyword:    String,
    pub sleep_time: i32,
    pub next:       NaiveDateTime
}

impl Active {
    fn interval(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.sleep_time.max(1)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Schedule {
    queue:    BTreeSet<(NaiveDateTime, i32)>,
    active:   HashMap<i32, Active>,
    channels: HashMap<String, HashMap<String, i32>>
}

impl Schedule {
    fn remove(&mut self, id: i32) -> Option<Active> {
        let entry = self.active.remove(&id)?;
        self.queue.remove(&(entry.next, id));
        if let Some(keywords) = self.channels.get_mut(&entry.channel) {
            keywords.remove(&entry.keyword);
            if keywords.is_empty() {
                self.channels.remove(&entry.channel);
            }
        }
        Some(entry)
    }

    fn insert(&mut self, entry: Active) {
        self.remove(entry.id);
        self.queue.insert((entry.next, entry.id));
        self.channels
            .entry(entry.channel.clone())
            .or_insert_with(HashMap::new)
            .insert(entry.keyword.clone(), entry.id);
        self.active.insert(entry.id, entry);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Idle,
    Wait(Duration),
    Due(i32, NaiveDateTime)
}

/// The queue of enabled watchers, ordered by next trigger time.
#[derive(Default)]
pub struct Watchers {
    state: Mutex<Schedule>,
    wake:  Condvar
}

impl Watchers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a watcher to run at `now`, replacing any earlier entry for it.
    pub fn enable(&self, watcher: &Watcher, channel: &str, now: NaiveDateTime) {
        self.state.lock().insert(Active {
            id:         watcher.id,
            channel:    channel.to_lowercase(),
            keyword:    watcher.keyword.to_lowercase(),
            sleep_time: watcher.sleep_time,
            next:       now
        });
        self.wake.notify_all();
    }

    pub fn disable(&self, id: i32) -> Option<Active> {
        self.state.lock().remove(id)
    }

    pub fn next(&self, now: NaiveDateTime) -> Next {
        let state = self.state.lock();
        match state.queue.iter().next() {
            None => Next::Idle,
            Some(&(next, id)) if next <= now => Next::Due(id, next),
            Some(&(next, _)) => {
                let remaining = next.signed_duration_since(now).to_std().unwrap_or(MIN_SLICE);
                Next::Wait((remaining / 2).max(MIN_SLICE).min(MAX_SLICE))
            }
        }
    }

    /// Moves a watcher that ran at `trigger` to `trigger + sleep_time`.
    /// Does nothing if it was disabled or re-enabled in the meantime.
    pub fn reschedule(&self, id: i32, trigger: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut state = self.state.lock();
        let mut entry = state.active.get(&id).filter(|x| x.next == trigger)?.clone();
        entry.next = trigger + entry.interval();
        let next = entry.next;
        state.insert(entry);
        Some(next)
    }

    pub fn find(&self, channel: &str, keyword: &str) -> Option<i32> {
        self.state.lock()
            .channels
            .get(&channel.to_lowercase())?
            .get(&keyword.to_lowercase())
            .cloned()
    }

    pub fn for_channel(&self, channel: &str) -> Vec<Active> {
        let state = self.state.lock();
        let mut xs: Vec<Active> = state.channels
            .get(&channel.to_lowercase())
            .map(|keywords| keywords.values().filter_map(|id| state.active.get(id).cloned()).collect())
            .unwrap_or_default();
        xs.sort_by(|a, b| a.keyword.cmp(&b.keyword));
        xs
    }

    pub fn len(&self) -> usize {
        self.state.lock().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sleep(&self, dur: Duration) {
        let mut state = self.state.lock();
        self.wake.wait_for(&mut state, dur);
    }

    pub fn notify(&self) {
        self.wake.notify_all();
    }
}

/// Puts a stored watcher on the schedule and registers its force command in its channel.
pub fn activate(bot: &Bot, watcher: &Watcher, channel: &str) {
    bot.watchers.enable(watcher, channel, now());
    bot.registry.write().register(Some(channel), Arc::new(Force::new(&watcher.keyword)));
}

pub fn deactivate(bot: &Bot, watcher: &Watcher, channel: &str) {
    bot.watchers.disable(watcher.id);
    bot.registry.write().unregister(Some(channel), &watcher.keyword);
}

/// Activates every enabled watcher in storage.
pub fn load(bot: &Bot) -> Outcome<usize> {
    let watchers = bot.db.read(|conn| {
        let mut xs = Vec::new();
        for watcher in db::watcher::enabled(conn)? {
            let chan = db::channel::by_id(conn, watcher.channel_id)?;
            xs.push((watcher, chan.name));
        }
        Ok(xs)
    })?;
    for (watcher, channel) in &watchers {
        activate(bot, watcher, channel);
    }
    Ok(watchers.len())
}

/// An immediate update of one watcher that leaves its schedule alone.
pub fn trigger(bot: &Bot, keyword: &str, channel: &str) -> Outcome<Option<String>> {
    let id = bot.watchers.find(channel, keyword).ok_or_else(||
        Error::failed(format!("There is no category watcher called {} in {}.", keyword, channel))
    )?;
    update::update(bot, id, false)
}

pub fn spawn(bot: Arc<Bot>) -> Outcome<thread::JoinHandle<()>> {
    Ok(thread::Builder::new()
        .name("watchers".to_owned())
        .spawn(move || run(&bot))?)
}

fn run(bot: &Bot) {
    while !bot.registered.wait_for(Duration::from_secs(1)) {
        if bot.exit.is_set() {
            return
        }
    }
    tracing::info!("Watching {} categories.", bot.watchers.len());
    while !bot.exit.is_set() {
        match bot.watchers.next(now()) {
            Next::Idle      => bot.watchers.sleep(IDLE),
            Next::Wait(dur) => bot.watchers.sleep(dur),
            Next::Due(id, trigger) => {
                update::update(bot, id, true).log(location!());
                bot.watchers.reschedule(id, trigger);
            }
        }
    }
}

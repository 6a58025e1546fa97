use hashbrown::HashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

pub const ERR_LINKCHANNEL: u16 = 470;
pub const ERR_CHANNELISFULL: u16 = 471;
pub const ERR_INVITEONLYCHAN: u16 = 473;
pub const ERR_BANNEDFROMCHAN: u16 = 474;
pub const ERR_BADCHANNELKEY: u16 = 475;
pub const ERR_THROTTLE: u16 = 480;
pub const RPL_ENDOFMOTD: u16 = 376;
pub const ERR_NOMOTD: u16 = 422;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinResult {
    Joined,
    Forwarded(String),
    Rejected { code: u16, reason: String }
}

type Key = (String, String);

fn key(channel: &str, nick: &str) -> Key {
    (channel.to_lowercase(), nick.to_lowercase())
}

/// Routes JOIN echoes and join-failure numerics to whichever invocation is
/// waiting on that channel and nickname.
#[derive(Default)]
pub struct Joins {
    next:    AtomicU64,
    waiting: Mutex<HashMap<Key, Vec<(u64, Sender<JoinResult>)>>>
}

pub struct Waiter<'a> {
    joins: &'a Joins,
    key:   Key,
    id:    u64,
    rx:    Receiver<JoinResult>
}

impl<'a> Waiter<'a> {
    /// Blocks until the server answers or the timeout runs out.
    pub fn wait(self, timeout: Duration) -> Option<JoinResult> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl<'a> Drop for Waiter<'a> {
    fn drop(&mut self) {
        self.joins.cancel(&self.key, self.id);
    }
}

impl Joins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must be called before the JOIN is sent, so no reply can slip past.
    pub fn expect(&self, channel: &str, nick: &str) -> Waiter {
        let (tx, rx) = mpsc::channel();
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        let key = key(channel, nick);
        self.waiting.lock().entry(key.clone()).or_insert_with(Vec::new).push((id, tx));
        Waiter { joins: self, key, id, rx }
    }

    fn cancel(&self, key: &Key, id: u64) {
        let mut waiting = self.waiting.lock();
        if let Some(senders) = waiting.get_mut(key) {
            senders.retain(|(x, _)| *x != id);
            if senders.is_empty() {
                waiting.remove(key);
            }
        }
    }

    fn resolve(&self, channel: &str, nick: &str, result: JoinResult) -> bool {
        match self.waiting.lock().remove(&key(channel, nick)) {
            None          => false,
            Some(senders) => {
                for (_, tx) in senders {
                    // A receiver that already timed out is fine to skip.
                    let _ = tx.send(result.clone());
                }
                true
            }
        }
    }

    pub fn observe_join(&self, channel: &str, nick: &str) -> bool {
        self.resolve(channel, nick, JoinResult::Joined)
    }

    /// Feeds a numeric reply. Parameters start with our own nickname.
    pub fn observe_numeric(&self, code: u16, params: &[String]) -> bool {
        let (nick, chan) = match params {
            [nick, chan, ..] => (nick, chan),
            _                => return false
        };
        let reason = params.last().cloned().unwrap_or_default();
        match code {
            ERR_LINKCHANNEL => match params.get(2) {
                Some(to) if params.len() > 3 => self.resolve(chan, nick, JoinResult::Forwarded(to.to_owned())),
                _ => self.resolve(chan, nick, JoinResult::Rejected { code, reason })
            },
            ERR_CHANNELISFULL | ERR_INVITEONLYCHAN | ERR_BANNEDFROMCHAN | ERR_BADCHANNELKEY | ERR_THROTTLE =>
                self.resolve(chan, nick, JoinResult::Rejected { code, reason }),
            _ => false
        }
    }

    pub fn pending(&self) -> usize {
        self.waiting.lock().values().map(Vec::len).sum()
    }
}

use chrono::{NaiveDateTime, Utc};
use hashbrown::HashSet;

use super::diff::Delta;
use super::report;
use crate::bot::Bot;
use crate::db::{self, Item};
use crate::error::*;

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Synchronises one watcher's items with its category and reports to its channel,
/// all in a single transaction. Returns the message that was sent, if any.
///
/// Scheduled runs of delta-only watchers report just the new items, which may be none;
/// forced runs always report everything.
pub fn update(bot: &Bot, watcher_id: i32, scheduled: bool) -> Outcome<Option<String>> {
    bot.db.transaction(|conn| {
        let watcher = db::watcher::by_id(conn, watcher_id)?;
        let site = db::site::by_id(conn, watcher.site_id)?;
        let chan = db::channel::by_id(conn, watcher.channel_id)?;
        let ignored = db::watcher::ignored(conn)?;

        let pages: HashSet<String> = bot.wiki
            .pages_in_category(&site, &watcher.category)?
            .into_iter()
            .filter(|title| !ignored.contains(title))
            .collect();
        let stored: HashSet<String> = db::watcher::items(conn, watcher.id)?
            .into_iter()
            .map(|item| item.title)
            .collect();
        let delta = Delta::new(&stored, &pages);

        if !delta.remove.is_empty() {
            let removed: Vec<String> = delta.remove.iter().cloned().collect();
            db::watcher::delete_items(conn, watcher.id, &removed)?;
        }
        if !delta.add.is_empty() {
            let mut added: Vec<String> = delta.add.iter().cloned().collect();
            added.sort();
            let touched = bot.wiki.touched(&site, &added)?;
            let fallback = now();
            for title in &added {
                let time = touched.get(title).cloned().unwrap_or(fallback);
                db::watcher::insert_item(conn, watcher.id, title, time)?;
            }
        }
        tracing::debug!(
            "{} in {}: {} added, {} removed",
            watcher.keyword, chan.name, delta.add.len(), delta.remove.len()
        );

        let mut items: Vec<Item> = db::watcher::items(conn, watcher.id)?;
        if scheduled && watcher.delta {
            items.retain(|item| delta.add.contains(&item.title));
        }
        if chan.silenced {
            return Ok(None)
        }
        let total = if items.is_empty() { 0 } else { bot.wiki.category_size(&site, &watcher.category)? };
        let message = report::compile(&watcher, &site, bot.shortener.as_ref(), &items, total, now());
        bot.irc.msg(&chan.name, &message)?;
        Ok(Some(message))
    })
}

use super::*;
use crate::background;
use crate::db::{NewWatcher, Watcher};

pub struct CategoryWatcher;

impl Command for CategoryWatcher {
    fn cmds(&self) -> Vec<String> {
        own(&["categorywatcher", "cw"])
    }
    fn usage(&self) -> String {
        "<add <keyword> <category> | delay <keyword> [<minutes>] | enable|disable <keyword> \
        | flag <keyword> <link|shorturl|waittime|delta> <on|off> \
        | set <keyword> <category|singular|plural|action|mintime|priority> <value> | list>".to_owned()
    }
    fn flag(&self) -> char { flags::CONFIG }
    fn arity(&self) -> usize { 1 }

    fn run(&self, args: &[&str], ctx: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        require_channel(ctx)?;
        let mode = args[0].to_lowercase();
        match (mode.as_str(), &args[1..]) {
            ("list", []) => list(bot, &ctx.channel),
            ("add", [keyword, category @ ..]) if !category.is_empty() =>
                add(bot, &ctx.channel, keyword, &category.join(" ")),
            ("enable", [keyword]) => {
                let watcher = configure(bot, &ctx.channel, keyword, |w| { w.enabled = true; Ok(()) })?;
                background::activate(bot, &watcher, &ctx.channel);
                Ok(vec![Reply(format!("Enabled {}.", watcher.keyword))])
            },
            ("disable", [keyword]) => {
                let watcher = configure(bot, &ctx.channel, keyword, |w| { w.enabled = false; Ok(()) })?;
                background::deactivate(bot, &watcher, &ctx.channel);
                Ok(vec![Reply(format!("Disabled {}.", watcher.keyword))])
            },
            ("delay", [keyword]) => {
                let watcher = find(bot, &ctx.channel, keyword)?;
                Ok(vec![Reply(format!(
                    "{} runs every {}.",
                    watcher.keyword, util::plural(watcher.sleep_time.max(1) as usize, "minute", "minutes")
                ))])
            },
            ("delay", [keyword, minutes]) => {
                let minutes: i32 = minutes.parse()?;
                if minutes < 1 {
                    return Err(InvalidArgs)
                }
                let watcher = configure(bot, &ctx.channel, keyword, |w| { w.sleep_time = minutes; Ok(()) })?;
                if watcher.enabled {
                    background::activate(bot, &watcher, &ctx.channel);
                }
                Ok(vec![Reply(format!(
                    "{} now runs every {}.", watcher.keyword, util::plural(minutes as usize, "minute", "minutes")
                ))])
            },
            ("flag", [keyword, name, switch]) => {
                let on = parse_switch(switch)?;
                let name = name.to_lowercase();
                let watcher = configure(bot, &ctx.channel, keyword, |w| {
                    match name.as_str() {
                        "link"     => w.show_link = on,
                        "shorturl" => w.show_short_url = on,
                        "waittime" => w.show_wait_time = on,
                        "delta"    => w.delta = on,
                        _          => return Err(InvalidArgs)
                    }
                    Ok(())
                })?;
                Ok(vec![Reply(format!("Turned {} {} for {}.", name, if on { "on" } else { "off" }, watcher.keyword))])
            },
            ("set", [keyword, name, value @ ..]) if !value.is_empty() => {
                let name = name.to_lowercase();
                let value = value.join(" ");
                let watcher = configure(bot, &ctx.channel, keyword, |w| {
                    match name.as_str() {
                        "category" => w.category = value.to_owned(),
                        "singular" => w.singular = value.to_owned(),
                        "plural"   => w.plural = value.to_owned(),
                        "action"   => w.action = value.to_owned(),
                        "mintime"  => w.min_wait_time = value.parse()?,
                        "priority" => w.priority = value.parse()?,
                        _          => return Err(InvalidArgs)
                    }
                    Ok(())
                })?;
                Ok(vec![Reply(format!("Set {} to {} for {}.", name, value, watcher.keyword))])
            },
            _ => Err(InvalidArgs)
        }
    }
}

fn find(bot: &Bot, channel: &str, keyword: &str) -> Outcome<Watcher> {
    bot.db.read(|conn| {
        let chan = db::channel::get(conn, channel)?;
        db::watcher::get(conn, chan.id, keyword)
    })
}

/// Loads a watcher in the channel, changes it, and saves it.
fn configure<F>(bot: &Bot, channel: &str, keyword: &str, f: F) -> Outcome<Watcher>
where F: FnOnce(&mut Watcher) -> Outcome<()> {
    bot.db.transaction(|conn| {
        let chan = db::channel::get(conn, channel)?;
        let mut watcher = db::watcher::get(conn, chan.id, &keyword.to_lowercase())?;
        f(&mut watcher)?;
        db::watcher::save(conn, &watcher)?;
        Ok(watcher)
    })
}

fn add(bot: &Bot, channel: &str, keyword: &str, category: &str) -> Outcome<Vec<Response>> {
    if bot.registry.read().lookup(keyword, channel).is_some() {
        return Err(Error::failed(format!("{} is already a command.", keyword)))
    }
    let watcher = bot.db.transaction(|conn| {
        let chan = db::channel::ensure(conn, channel)?;
        let site = db::site::for_channel(conn, chan.base_wiki_id)?;
        let mut watcher = db::watcher::add(conn, &NewWatcher { channel_id: chan.id, site_id: site.id, keyword, category })?;
        watcher.enabled = true;
        db::watcher::save(conn, &watcher)?;
        Ok(watcher)
    })?;
    background::activate(bot, &watcher, channel);
    Ok(vec![Reply(format!("Now watching {} as {}.", watcher.category, watcher.keyword))])
}

fn list(bot: &Bot, channel: &str) -> Outcome<Vec<Response>> {
    let watchers = bot.db.read(|conn| match db::channel::find(conn, channel)? {
        None       => Ok(Vec::new()),
        Some(chan) => db::watcher::for_channel(conn, chan.id)
    })?;
    if watchers.is_empty() {
        return Ok(vec![Reply("No category watchers are defined here.".to_owned())])
    }
    let shown: Vec<String> = watchers
        .iter()
        .map(|w| if w.enabled {
            format!("{} ({}, every {} min)", w.keyword, w.category, w.sleep_time)
        } else {
            format!("{} ({}, disabled)", w.keyword, w.category)
        })
        .collect();
    Ok(vec![Reply(shown.join("; "))])
}

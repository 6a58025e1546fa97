use super::*;
use crate::events::JoinResult;

pub struct Join;

impl Command for Join {
    fn cmds(&self) -> Vec<String> {
        own(&["join"])
    }
    fn usage(&self) -> String { "<#channel>".to_owned() }
    fn flag(&self) -> char { flags::SUPERUSER }
    fn arity(&self) -> usize { 1 }

    fn run(&self, args: &[&str], _: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        let chan = args[0].to_lowercase();
        if !chan.starts_with('#') {
            return Err(InvalidArgs)
        }
        bot.db.transaction(|conn| db::channel::set_enabled(conn, &chan, true))?;
        let waiter = bot.joins.expect(&chan, &bot.nick);
        bot.irc.join(&chan)?;
        match waiter.wait(bot.join_timeout) {
            Some(JoinResult::Joined) => Ok(vec![Reply(format!("Joined {}.", chan))]),
            Some(JoinResult::Forwarded(to)) => {
                bot.db.transaction(|conn| {
                    db::channel::set_enabled(conn, &chan, false)?;
                    db::channel::set_enabled(conn, &to, true)
                })?;
                Ok(vec![Reply(format!("{} forwarded me to {}.", chan, to))])
            },
            Some(JoinResult::Rejected { code, reason }) => {
                bot.db.transaction(|conn| db::channel::set_enabled(conn, &chan, false))?;
                tracing::warn!("Could not join {}: {} {}", chan, code, reason);
                Err(Error::failed(format!("I couldn't join {}: {}", chan, reason)))
            },
            None => Ok(vec![Reply(format!(
                "The server never confirmed {}. It stays enabled, so I'll try again on reconnect.", chan
            ))])
        }
    }
}

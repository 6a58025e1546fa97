use super::*;
use crate::background;
use crate::logging::*;

pub struct FetchAll;

impl Command for FetchAll {
    fn cmds(&self) -> Vec<String> {
        own(&["fetchall"])
    }
    fn usage(&self) -> String { "".to_owned() }

    fn run(&self, _: &[&str], ctx: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        require_channel(ctx)?;
        let active = bot.watchers.for_channel(&ctx.channel);
        if active.is_empty() {
            return Err(Error::failed("No category watchers are enabled here."))
        }
        for watcher in active {
            background::trigger(bot, &watcher.keyword, &ctx.channel).log(location!());
        }
        Ok(Vec::new())
    }
}

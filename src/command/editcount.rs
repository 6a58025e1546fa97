use super::*;

pub struct EditCount;

impl Command for EditCount {
    fn cmds(&self) -> Vec<String> {
        own(&["editcount", "count"])
    }
    fn usage(&self) -> String { "[<user>]".to_owned() }

    fn run(&self, args: &[&str], ctx: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        let user = if args.is_empty() { ctx.nick.to_owned() } else { args.join(" ") };
        let site = bot.db.read(|conn| {
            let base = db::channel::find(conn, &ctx.channel)?.and_then(|chan| chan.base_wiki_id);
            db::site::for_channel(conn, base)
        })?;
        match bot.wiki.edit_count(&site, &user)? {
            None        => Err(Error::failed(format!("The user {} does not exist on {}.", user, site.name))),
            Some(count) => Ok(vec![Reply(format!("The user {} has {} edits on {}.", user, count, site.name))])
        }
    }
}

use super::*;

pub struct BaseWiki;

impl Command for BaseWiki {
    fn cmds(&self) -> Vec<String> {
        own(&["basewiki"])
    }
    fn usage(&self) -> String { "[<wiki>]".to_owned() }
    fn flag(&self) -> char { flags::CONFIG }

    fn run(&self, args: &[&str], ctx: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        require_channel(ctx)?;
        match args {
            [] => {
                let site = bot.db.read(|conn| {
                    let base = db::channel::find(conn, &ctx.channel)?.and_then(|chan| chan.base_wiki_id);
                    db::site::for_channel(conn, base)
                })?;
                Ok(vec![Reply(format!("{} uses {}.", ctx.channel, site.name))])
            },
            [name] => {
                let site = bot.db.transaction(|conn| {
                    let site = db::site::get(conn, name)?;
                    let mut chan = db::channel::ensure(conn, &ctx.channel)?;
                    chan.base_wiki_id = Some(site.id);
                    db::channel::save(conn, &chan)?;
                    Ok(site)
                })?;
                Ok(vec![Reply(format!("{} now uses {}.", ctx.channel, site.name))])
            },
            _ => Err(InvalidArgs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{editcount, site};
    use crate::db::NewSite;
    use crate::testing;

    #[test]
    fn switches_the_channel_wiki() {
        let (bot, _fx) = testing::bot();
        let (chan, _) = testing::seed(&bot.db);
        let other = bot.db.transaction(|conn| db::site::add(conn, &NewSite {
            name:         "commons",
            api:          "https://commons.wikimedia.org/w/api.php",
            article_path: "https://commons.wikimedia.org/wiki/$1",
            username:     None,
            password:     None
        })).unwrap();
        let ctx = Context::mock(testing::CHANNEL, "Owner");
        assert_eq!(BaseWiki.test("", &ctx, &bot).unwrap(), format!("{} uses enwiki.", testing::CHANNEL));
        BaseWiki.test("commons", &ctx, &bot).unwrap();
        let stored = bot.db.read(|conn| db::channel::by_id(conn, chan)).unwrap();
        assert_eq!(stored.base_wiki_id, Some(other.id));
        assert!(BaseWiki.test("nowhere", &ctx, &bot).is_err());
    }

    #[test]
    fn editcount_works_once_a_wiki_is_set() {
        let (bot, _fx) = testing::bot();
        let ctx = Context::mock("#fresh", "Owner");
        assert!(BaseWiki.test("", &ctx, &bot).is_err());
        site::Site
            .test("add enwiki https://en.wikipedia.org/w/api.php https://en.wikipedia.org/wiki/$1", &ctx, &bot)
            .unwrap();
        BaseWiki.test("enwiki", &ctx, &bot).unwrap();
        let text = editcount::EditCount.test(testing::EDITOR, &ctx, &bot).unwrap();
        assert!(text.contains("500"));
    }
}

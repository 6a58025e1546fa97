use super::*;
use crate::db::NewSite;

pub struct Site;

impl Command for Site {
    fn cmds(&self) -> Vec<String> {
        own(&["site", "wiki"])
    }
    fn usage(&self) -> String { "<add <name> <api url> <article path> | list>".to_owned() }
    fn flag(&self) -> char { flags::OWNER }
    fn arity(&self) -> usize { 1 }

    fn run(&self, args: &[&str], _: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        match args {
            [mode, name, api, article_path] if mode.eq_ignore_ascii_case("add") => {
                if !article_path.contains("$1") {
                    return Err(Error::failed("The article path needs a $1 where the title goes."))
                }
                let site = bot.db.transaction(|conn| db::site::add(conn, &NewSite {
                    name:         *name,
                    api:          *api,
                    article_path: *article_path,
                    username:     None,
                    password:     None
                }))?;
                Ok(vec![Reply(format!("Added the wiki {}.", site.name))])
            },
            [mode] if mode.eq_ignore_ascii_case("list") => {
                let sites = bot.db.read(db::site::all)?;
                if sites.is_empty() {
                    return Ok(vec![Reply("No wikis are configured.".to_owned())])
                }
                let names: Vec<String> = sites.into_iter().map(|x| format!("{} ({})", x.name, x.api)).collect();
                Ok(vec![Reply(names.join(", "))])
            },
            _ => Err(InvalidArgs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn adds_and_lists() {
        let (bot, _fx) = testing::bot();
        let ctx = testing::owner();
        Site.test("add enwiki https://en.wikipedia.org/w/api.php https://en.wikipedia.org/wiki/$1", &ctx, &bot).unwrap();
        let site = bot.db.read(|conn| db::site::get(conn, "enwiki")).unwrap();
        assert_eq!(site.api, "https://en.wikipedia.org/w/api.php");
        assert_eq!(Site.test("list", &ctx, &bot).unwrap(), "enwiki (https://en.wikipedia.org/w/api.php)");
    }

    #[test]
    fn needs_a_title_slot() {
        let (bot, _fx) = testing::bot();
        assert!(Site.test("add enwiki https://en.wikipedia.org/w/api.php https://en.wikipedia.org/wiki/", &testing::owner(), &bot).is_err());
        assert!(bot.db.read(db::site::all).unwrap().is_empty());
    }
}

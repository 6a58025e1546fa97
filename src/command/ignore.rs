use super::*;

pub struct Ignore;

impl Command for Ignore {
    fn cmds(&self) -> Vec<String> {
        own(&["ignore"])
    }
    fn usage(&self) -> String { "<add <title> | delete <title> | list>".to_owned() }
    fn flag(&self) -> char { flags::CONFIG }
    fn arity(&self) -> usize { 1 }

    fn run(&self, args: &[&str], _: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        let mode = args[0].to_lowercase();
        let title = args[1..].join(" ");
        match (mode.as_str(), title.is_empty()) {
            ("add", false) => {
                bot.db.transaction(|conn| db::watcher::ignore(conn, &title))?;
                Ok(vec![Reply(format!("Category watchers will now skip {}.", title))])
            },
            ("delete", false) => {
                if bot.db.transaction(|conn| db::watcher::unignore(conn, &title))? {
                    Ok(vec![Reply(format!("Category watchers will report {} again.", title))])
                } else {
                    Err(Error::failed(format!("{} isn't being ignored.", title)))
                }
            },
            ("list", true) => {
                let mut titles: Vec<String> = bot.db.read(db::watcher::ignored)?.into_iter().collect();
                if titles.is_empty() {
                    return Ok(vec![Reply("No pages are ignored.".to_owned())])
                }
                titles.sort();
                Ok(titles.into_iter().map(Private).collect())
            },
            _ => Err(InvalidArgs)
        }
    }
}

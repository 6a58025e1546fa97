use super::*;

pub struct Keyword;

impl Command for Keyword {
    fn cmds(&self) -> Vec<String> {
        own(&["keyword"])
    }
    fn usage(&self) -> String { "<set [--action] <name> <response> | delete <name>>".to_owned() }
    fn flag(&self) -> char { flags::CONFIG }
    fn arity(&self) -> usize { 2 }

    fn run(&self, args: &[&str], _: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        let (args, action) = take_flag(args, "--action");
        match args.as_slice() {
            [mode, name, response @ ..] if mode.eq_ignore_ascii_case("set") && !response.is_empty() => {
                let response = response.join(" ");
                bot.db.transaction(|conn| db::keyword::set(conn, name, &response, action))?;
                Ok(vec![Reply(format!("Set the keyword {}.", name.to_lowercase()))])
            },
            [mode, name] if mode.eq_ignore_ascii_case("delete") => {
                if bot.db.transaction(|conn| db::keyword::delete(conn, name))? {
                    Ok(vec![Reply(format!("Deleted the keyword {}.", name.to_lowercase()))])
                } else {
                    Err(Error::failed(format!("There is no keyword {}.", name)))
                }
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
    fn sets_and_deletes() {
        let (bot, _fx) = testing::bot();
        let ctx = testing::owner();
        Keyword.test("set --action Hug hugs everyone", &ctx, &bot).unwrap();
        let stored = bot.db.read(|conn| db::keyword::find(conn, "hug")).unwrap().unwrap();
        assert_eq!(stored.response, "hugs everyone");
        assert!(stored.action);
        Keyword.test("delete hug", &ctx, &bot).unwrap();
        assert!(Keyword.test("delete hug", &ctx, &bot).is_err());
    }
}

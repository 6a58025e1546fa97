use super::*;

pub struct FlagGroup;

impl Command for FlagGroup {
    fn cmds(&self) -> Vec<String> {
        own(&["flaggroup"])
    }
    fn usage(&self) -> String { "<add <name> <flags> [deny] | delete <name> | list>".to_owned() }
    fn flag(&self) -> char { flags::ACCESS }
    fn arity(&self) -> usize { 1 }

    fn run(&self, args: &[&str], _: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        let mode = args[0].to_lowercase();
        match (mode.as_str(), &args[1..]) {
            ("add", [name, flags]) => add(bot, name, flags, false),
            ("add", [name, flags, deny]) if deny.eq_ignore_ascii_case("deny") => add(bot, name, flags, true),
            ("delete", [name]) => {
                bot.db.transaction(|conn| db::access::delete_group(conn, name))?;
                bot.flags.invalidate();
                Ok(vec![Reply(format!("Deleted the flag group {}.", name))])
            },
            ("list", []) => {
                let groups = bot.db.read(db::access::groups)?;
                let shown: Vec<String> = groups
                    .into_iter()
                    .map(|group| format!(
                        "{} ({}{}{})",
                        group.name,
                        if group.deny { "-" } else { "+" },
                        group.flags,
                        if group.protected { ", protected" } else { "" }
                    ))
                    .collect();
                Ok(vec![Reply(shown.join(", "))])
            },
            _ => Err(InvalidArgs)
        }
    }
}

fn add(bot: &Bot, name: &str, flags: &str, deny: bool) -> Outcome<Vec<Response>> {
    if !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::failed(format!("{} is not a set of flags.", flags)))
    }
    bot.db.transaction(|conn| db::access::add_group(conn, name, flags, deny))?;
    bot.flags.invalidate();
    Ok(vec![Reply(format!(
        "Added the {}flag group {} with {}.", if deny { "deny " } else { "" }, name, flags
    ))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn deny_groups_subtract() {
        let (bot, _fx) = testing::bot();
        let admin = testing::owner();
        let ctx = Context::mock("#help", "Troll");
        assert!(bot.flags.authorized(&ctx, flags::STANDARD).unwrap());
        FlagGroup.test("add quiet S deny", &admin, &bot).unwrap();
        super::super::access::Access.test("add quiet Troll", &admin, &bot).unwrap();
        assert!(!bot.flags.authorized(&ctx, flags::STANDARD).unwrap());
    }

    #[test]
    fn protected_groups_stay() {
        let (bot, _fx) = testing::bot();
        assert!(FlagGroup.test("delete owner", &testing::owner(), &bot).is_err());
        FlagGroup.test("add temp C", &testing::owner(), &bot).unwrap();
        FlagGroup.test("delete temp", &testing::owner(), &bot).unwrap();
        assert!(bot.db.read(|conn| db::access::group(conn, "temp")).is_err());
    }

    #[test]
    fn lists_groups() {
        let (bot, _fx) = testing::bot();
        let text = FlagGroup.test("list", &testing::owner(), &bot).unwrap();
        assert!(text.contains("owner (+OPACS, protected)"));
    }

    #[test]
    fn rejects_odd_flags() {
        let (bot, _fx) = testing::bot();
        assert!(FlagGroup.test("add weird !?", &testing::owner(), &bot).is_err());
    }
}

use super::*;
use crate::mask::Hostmask;

pub struct Access;

impl Command for Access {
    fn cmds(&self) -> Vec<String> {
        own(&["access"])
    }
    fn usage(&self) -> String { "<add|delete> <group> <nick!user@host | $a:account | #channel>".to_owned() }
    fn flag(&self) -> char { flags::ACCESS }
    fn arity(&self) -> usize { 3 }

    fn run(&self, args: &[&str], _: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        let (mode, group, target) = match args {
            [mode, group, target] => (mode.to_lowercase(), *group, *target),
            _                     => return Err(InvalidArgs)
        };
        let add = match mode.as_str() {
            "add"              => true,
            "delete" | "remove" => false,
            _                  => return Err(InvalidArgs)
        };
        let shown = if target.starts_with('#') {
            let chan = target.to_lowercase();
            bot.db.transaction(|conn| if add {
                db::access::add_channel(conn, group, &chan)
            } else {
                db::access::delete_channel(conn, group, &chan)
            })?;
            chan
        } else {
            let mask = Hostmask::parse(target).ok_or(InvalidArgs)?;
            bot.db.transaction(|conn| if add {
                db::access::add_user(conn, group, &mask, false)
            } else {
                db::access::delete_user(conn, group, &mask)
            })?;
            mask.to_string()
        };
        bot.flags.invalidate();
        Ok(vec![Reply(if add {
            format!("Added {} to {}.", shown, group)
        } else {
            format!("Removed {} from {}.", shown, group)
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn grants_and_revokes() {
        let (bot, _fx) = testing::bot();
        let admin = testing::owner();
        let ctx = Context::mock("#help", "Helper");
        assert!(!bot.flags.authorized(&ctx, flags::CONFIG).unwrap());

        bot.db.transaction(|conn| db::access::add_group(conn, "helpers", "C", false)).unwrap();
        assert_eq!(Access.test("add helpers Helper!*@*", &admin, &bot).unwrap(), "Added Helper!*@* to helpers.");
        assert!(bot.flags.authorized(&ctx, flags::CONFIG).unwrap());

        Access.test("delete helpers Helper!*@*", &admin, &bot).unwrap();
        assert!(!bot.flags.authorized(&ctx, flags::CONFIG).unwrap());
    }

    #[test]
    fn channel_associations_create_the_channel() {
        let (bot, _fx) = testing::bot();
        Access.test("add standard #New", &testing::owner(), &bot).unwrap();
        let chan = bot.db.read(|conn| db::channel::get(conn, "#new")).unwrap();
        assert!(!chan.enabled);
    }

    #[test]
    fn protected_rows_stay() {
        let (bot, _fx) = testing::bot();
        assert!(Access.test("delete standard *!*@*", &testing::owner(), &bot).is_err());
    }

    #[test]
    fn bad_masks_are_invalid() {
        let (bot, _fx) = testing::bot();
        match Access.test("add standard a!b", &testing::owner(), &bot) {
            Err(InvalidArgs) => (),
            other            => panic!("expected InvalidArgs, got {:?}", other)
        }
    }
}

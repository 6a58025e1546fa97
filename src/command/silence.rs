use super::*;

pub struct Silence;

impl Command for Silence {
    fn cmds(&self) -> Vec<String> {
        own(&["silence"])
    }
    fn usage(&self) -> String { "[on|off]".to_owned() }
    fn flag(&self) -> char { flags::CONFIG }

    fn run(&self, args: &[&str], ctx: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        require_channel(ctx)?;
        let silenced = bot.db.transaction(|conn| {
            let mut chan = db::channel::ensure(conn, &ctx.channel)?;
            chan.silenced = match args {
                []       => !chan.silenced,
                [switch] => parse_switch(switch)?,
                _        => return Err(InvalidArgs)
            };
            db::channel::save(conn, &chan)?;
            Ok(chan.silenced)
        })?;
        Ok(vec![Reply(if silenced {
            format!("{} is now silenced.", ctx.channel)
        } else {
            format!("{} is no longer silenced.", ctx.channel)
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn toggles() {
        let (bot, _fx) = testing::bot();
        let ctx = testing::owner();
        Silence.test("", &ctx, &bot).unwrap();
        assert!(bot.db.read(|conn| db::channel::is_silenced(conn, &ctx.channel)).unwrap());
        Silence.test("", &ctx, &bot).unwrap();
        assert!(!bot.db.read(|conn| db::channel::is_silenced(conn, &ctx.channel)).unwrap());
    }

    #[test]
    fn sets_explicitly() {
        let (bot, _fx) = testing::bot();
        let ctx = testing::owner();
        Silence.test("on", &ctx, &bot).unwrap();
        Silence.test("on", &ctx, &bot).unwrap();
        assert!(bot.db.read(|conn| db::channel::is_silenced(conn, &ctx.channel)).unwrap());
    }
}

use super::*;

pub struct Help;

impl Command for Help {
    fn cmds(&self) -> Vec<String> {
        own(&["help"])
    }
    fn usage(&self) -> String { "<command>".to_owned() }
    fn arity(&self) -> usize { 1 }

    fn run(&self, args: &[&str], ctx: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        let name = args[0].trim_start_matches(bot.trigger.as_str()).to_lowercase();
        let command = bot.registry.read()
            .resolve(&name, &ctx.channel)
            .ok_or_else(|| Error::failed(format!("I don't know the command {}.", name)))?;
        let usage = command.usage();
        Ok(vec![Reply(if usage.is_empty() {
            format!("Usage: \x02{}{}\x02", bot.trigger, name)
        } else {
            format!("Usage: \x02{}{}\x02 {}", bot.trigger, name, usage)
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn shows_usage() {
        let (bot, _fx) = testing::bot();
        let ctx = Context::mock("#help", "Someone");
        assert_eq!(Help.test("!die", &ctx, &bot).unwrap(), "Usage: \x02!die\x02 @confirm");
    }

    #[test]
    fn unknown_commands_fail() {
        let (bot, _fx) = testing::bot();
        assert!(Help.test("nothing", &Context::mock("#help", "Someone"), &bot).is_err());
    }
}

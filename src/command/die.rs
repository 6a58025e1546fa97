use super::*;

pub struct Die;

const CONFIRM: &str = "@confirm";

impl Command for Die {
    fn cmds(&self) -> Vec<String> {
        own(&["die"])
    }
    fn usage(&self) -> String { CONFIRM.to_owned() }
    fn flag(&self) -> char { flags::OWNER }
    fn arity(&self) -> usize { 1 }

    fn run(&self, args: &[&str], ctx: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        if args != [CONFIRM] {
            return Err(InvalidArgs)
        }
        tracing::warn!("Shutdown requested by {}", ctx);
        bot.irc.quit("Shutting down.")?;
        bot.shutdown();
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn needs_confirmation() {
        let (bot, _fx) = testing::bot();
        assert!(Die.test("now", &testing::owner(), &bot).is_err());
        assert!(!bot.exit.is_set());
    }

    #[test]
    fn raises_the_exit_latch() {
        let (bot, fx) = testing::bot();
        Die.test("@confirm", &testing::owner(), &bot).unwrap();
        assert!(bot.exit.is_set());
        assert_eq!(fx.quits(), vec!["Shutting down.".to_owned()]);
    }
}

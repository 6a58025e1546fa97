use super::*;
use crate::background;

/// Reports one category watcher on demand. Registered in the watcher's channel under its keyword.
pub struct Force {
    keyword: String
}

impl Force {
    pub fn new(keyword: &str) -> Self {
        Self { keyword: keyword.to_lowercase() }
    }
}

impl Command for Force {
    fn cmds(&self) -> Vec<String> {
        vec![self.keyword.to_owned()]
    }
    fn usage(&self) -> String { "".to_owned() }

    fn run(&self, _: &[&str], ctx: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        background::trigger(bot, &self.keyword, &ctx.channel)?;
        Ok(Vec::new())
    }
}

use regex::Regex;

use crate::error::*;

/// A recognised command line, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command:          String,
    pub args:             Vec<String>,
    pub redirect:         Vec<String>,
    pub override_silence: bool
}

impl Invocation {
    pub fn args(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

pub struct Parser {
    pattern: Regex
}

impl Parser {
    /// Commands are `<trigger>[<nick> ]<command>` or `<nick>[ ,>:]<command>`.
    pub fn new(trigger: &str, nick: &str) -> Outcome<Self> {
        let trigger = regex::escape(trigger);
        let nick = regex::escape(nick);
        let pattern = Regex::new(&format!(
            r"(?i)^(?:{t}(?:(?P<botname>{n}) )?(?P<cmd>[0-9a-z_-]+)|(?P<botname2>{n})[ ,>:] ?(?P<cmd2>[0-9a-z_-]+))(?:\s+(?P<args>.*?))?\s*$",
            t = trigger,
            n = nick
        ))?;
        Ok(Self { pattern })
    }

    pub fn parse(&self, text: &str) -> Option<Invocation> {
        let caps = self.pattern.captures(text.trim_end_matches(&['\r', '\n'][..]))?;
        let command = caps.name("cmd").or_else(|| caps.name("cmd2"))?.as_str().to_lowercase();
        let override_silence = caps.name("botname").or_else(|| caps.name("botname2")).is_some();
        let tokens = caps.name("args").map_or(Vec::new(), |args| args.as_str().split_whitespace().collect());
        let (args, redirect) = redirect(tokens);
        Some(Invocation { command, args, redirect, override_silence })
    }
}

/// Pulls `> target` and `>target` tokens out of an argument list.
/// A lone `>` at the very end is an ordinary argument.
pub fn redirect(tokens: Vec<&str>) -> (Vec<String>, Vec<String>) {
    let mut args = Vec::new();
    let mut targets = Vec::new();
    let mut redirecting = false;
    for token in tokens {
        if redirecting {
            redirecting = false;
            targets.push(token.to_owned());
        } else if token == ">" {
            redirecting = true;
        } else if let Some(target) = token.strip_prefix('>') {
            targets.push(target.to_owned());
        } else {
            args.push(token.to_owned());
        }
    }
    if redirecting {
        args.push(">".to_owned());
    }
    (args, targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::own;

    fn parser() -> Parser {
        Parser::new("!", "HelpBot").unwrap()
    }

    #[test]
    fn parses_trigger() {
        let inv = parser().parse("!editcount SomeUser").unwrap();
        assert_eq!(inv.command, "editcount");
        assert_eq!(inv.args, own(&["SomeUser"]));
        assert!(!inv.override_silence);
    }

    #[test]
    fn parses_without_arguments() {
        let inv = parser().parse("!help").unwrap();
        assert_eq!(inv.command, "help");
        assert!(inv.args.is_empty());
    }

    #[test]
    fn trigger_with_botname_overrides_silence() {
        let inv = parser().parse("!helpbot help me").unwrap();
        assert_eq!(inv.command, "help");
        assert_eq!(inv.args, own(&["me"]));
        assert!(inv.override_silence);
    }

    #[test]
    fn addressing_by_name() {
        for text in &["HelpBot: help", "helpbot, help", "HELPBOT help", "HelpBot>help", "HelpBot: Help"] {
            let inv = parser().parse(text).unwrap();
            assert_eq!(inv.command, "help", "{}", text);
            assert!(inv.override_silence);
        }
    }

    #[test]
    fn ignores_chatter() {
        assert!(parser().parse("hello there").is_none());
        assert!(parser().parse("!").is_none());
        assert!(parser().parse("someone: help").is_none());
        assert!(parser().parse("!what?").is_none());
    }

    #[test]
    fn collapses_whitespace() {
        let inv = parser().parse("!access   add  owner  bob\r").unwrap();
        assert_eq!(inv.args, own(&["add", "owner", "bob"]));
    }

    #[test]
    fn custom_triggers_are_literal() {
        let parser = Parser::new(".", "bot").unwrap();
        assert!(parser.parse(".help").is_some());
        assert!(parser.parse("xhelp").is_none());
    }

    #[test]
    fn redirects_to_next_token() {
        let (args, targets) = redirect(vec!["a", ">", "#other", "b"]);
        assert_eq!(args, own(&["a", "b"]));
        assert_eq!(targets, own(&["#other"]));
    }

    #[test]
    fn redirects_attached_targets() {
        let (args, targets) = redirect(vec![">bob", "a", ">#x"]);
        assert_eq!(args, own(&["a"]));
        assert_eq!(targets, own(&["bob", "#x"]));
    }

    #[test]
    fn trailing_redirect_is_literal() {
        let (args, targets) = redirect(vec!["a", ">"]);
        assert_eq!(args, own(&["a", ">"]));
        assert!(targets.is_empty());
    }

    #[test]
    fn parse_applies_redirect() {
        let inv = parser().parse("!editcount Foo > Bar").unwrap();
        assert_eq!(inv.args, own(&["Foo"]));
        assert_eq!(inv.redirect, own(&["Bar"]));
    }
}

use super::*;

pub struct CommandAlias;

const NULL: &str = "null";

impl Command for CommandAlias {
    fn cmds(&self) -> Vec<String> {
        own(&["commandalias", "alias"])
    }
    fn usage(&self) -> String {
        "<add|delete|list> [--global] [<alias> [<command>|null]]".to_owned()
    }
    fn flag(&self) -> char { flags::CONFIG }
    fn arity(&self) -> usize { 1 }

    fn run(&self, args: &[&str], ctx: &Context, bot: &Bot) -> Outcome<Vec<Response>> {
        let (args, global) = take_flag(args, "--global");
        if !global {
            require_channel(ctx)?;
        }
        let scope = if global { None } else { Some(ctx.channel.as_str()) };
        match args.as_slice() {
            [mode, invocation, target] if mode.eq_ignore_ascii_case("add") => {
                let target = Some(target.to_lowercase()).filter(|x| x != NULL);
                add(bot, scope, &invocation.to_lowercase(), target.as_deref())?;
                Ok(vec![Reply(match target {
                    Some(target) => format!("Aliased {} to {}.", invocation, target),
                    None         => format!("Disabled {}.", invocation)
                })])
            },
            [mode, invocation] if mode.eq_ignore_ascii_case("delete") => {
                delete(bot, scope, &invocation.to_lowercase())?;
                Ok(vec![Reply(format!("Removed the alias {}.", invocation))])
            },
            [mode] if mode.eq_ignore_ascii_case("list") => {
                let aliases = bot.registry.read().aliases(scope);
                if aliases.is_empty() {
                    return Ok(vec![Reply("No aliases are defined here.".to_owned())])
                }
                Ok(aliases
                    .into_iter()
                    .map(|(invocation, target)| Private(match target {
                        Some(target) => format!("{} → {}", invocation, target),
                        None         => format!("{} (disabled)", invocation)
                    }))
                    .collect())
            },
            _ => Err(InvalidArgs)
        }
    }
}

fn channel_id(conn: &mut diesel::SqliteConnection, scope: Option<&str>) -> Outcome<Option<i32>> {
    match scope {
        None       => Ok(None),
        Some(chan) => Ok(Some(db::channel::ensure(conn, chan)?.id))
    }
}

/// Stores an alias and registers it, or neither.
fn add(bot: &Bot, scope: Option<&str>, invocation: &str, target: Option<&str>) -> Outcome<()> {
    bot.db.transaction(|conn| {
        let id = channel_id(conn, scope)?;
        db::alias::add(conn, id, invocation, target)?;
        bot.registry.write().add_alias(scope, invocation, target)
    })
}

fn delete(bot: &Bot, scope: Option<&str>, invocation: &str) -> Outcome<()> {
    bot.db.transaction(|conn| {
        let id = channel_id(conn, scope)?;
        db::alias::delete(conn, id, invocation)
    })?;
    bot.registry.write().remove_alias(scope, invocation);
    Ok(())
}

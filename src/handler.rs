use crate::bot::Bot;
use crate::command::Response;
use crate::command::Response::*;
use crate::context::Context;
use crate::db;
use crate::error::*;
use crate::logging::clean;
use crate::parser::Invocation;

pub const ACCESS_DENIED: &str = "Access denied.";
pub const NO_RESULTS: &str = "I'm sorry, I couldn't find anything.";

/// Handles one line of channel or private text. Anything that isn't a command is ignored.
pub fn handle(bot: &Bot, ctx: &Context, text: &str) -> Outcome<()> {
    let invocation = match bot.parser.parse(text) {
        None    => return Ok(()),
        Some(x) => x
    };
    if ctx.is_channel()
    && !invocation.override_silence
    && bot.db.read(|conn| db::channel::is_silenced(conn, &ctx.channel))? {
        tracing::debug!("Ignoring {} in silenced {}", invocation.command, ctx.channel);
        return Ok(())
    }
    tracing::info!("{}{} <{}> {}", ctx.since(), ctx.channel, ctx.nick, clean(text));
    match dispatch(bot, ctx, &invocation) {
        Ok(responses) => deliver(bot, ctx, &invocation.redirect, &responses),
        Err(e)        => match explain(bot, ctx, &invocation, e)? {
            None           => Ok(()),
            Some(response) => deliver(bot, ctx, &[], &[response])
        }
    }
}

fn dispatch(bot: &Bot, ctx: &Context, invocation: &Invocation) -> Outcome<Vec<Response>> {
    let resolved = bot.registry.read().resolve(&invocation.command, &ctx.channel);
    let command = match resolved {
        None    => return keyword(bot, &invocation.command),
        Some(x) => x
    };
    if !bot.flags.authorized(ctx, command.flag())? {
        return Err(Unauthorized)
    }
    let args = invocation.args();
    if args.len() < command.arity() {
        return Err(ArgumentCount {
            command:  invocation.command.to_owned(),
            required: command.arity(),
            given:    args.len()
        })
    }
    command.run(&args, ctx, bot)
}

fn keyword(bot: &Bot, name: &str) -> Outcome<Vec<Response>> {
    match bot.db.read(|conn| db::keyword::find(conn, name))? {
        None                     => Err(Unknown),
        Some(k) if k.action      => Ok(vec![Action(k.response)]),
        Some(k)                  => Ok(vec![Message(k.response)])
    }
}

/// Turns a failed invocation into at most one line for the invoker.
fn explain(bot: &Bot, ctx: &Context, invocation: &Invocation, err: Error) -> Outcome<Option<Response>> {
    Ok(match err {
        Unknown => None,
        Unauthorized => {
            tracing::warn!("{} was denied {} in {}", ctx, invocation.command, ctx.channel);
            bot.irc.notice(&ctx.nick, ACCESS_DENIED)?;
            if let Some(debug) = &bot.debug_channel {
                bot.irc.msg(debug, &format!(
                    "Access denied: {} tried {} {} in {}",
                    ctx, invocation.command, invocation.args.join(" "), ctx.channel
                ))?;
            }
            None
        },
        ArgumentCount { command, required, given } => Some(Reply(format!(
            "Not enough arguments to {}: it needs {}, but you gave {}. {}",
            command, required, given, usage(bot, ctx, &command)
        ))),
        InvalidArgs  => Some(Reply(usage(bot, ctx, &invocation.command))),
        NoResults    => Some(Reply(NO_RESULTS.to_owned())),
        Failed(msg)  => Some(Reply(msg)),
        e => {
            tracing::error!("{} failed for {}: {}", invocation.command, ctx, clean(&e.to_string()));
            Some(Reply(match &bot.owner {
                None        => "Something went wrong.".to_owned(),
                Some(owner) => format!("Something went wrong. Please let {} know.", owner)
            }))
        }
    })
}

fn usage(bot: &Bot, ctx: &Context, name: &str) -> String {
    match bot.registry.read().resolve(name, &ctx.channel) {
        None          => "I don't know that command.".to_owned(),
        Some(command) => format!("Usage: \x02{}{}\x02 {}", bot.trigger, name, command.usage())
            .trim_end()
            .to_owned()
    }
}

/// Sends responses to the redirect targets, or back where they came from.
fn deliver(bot: &Bot, ctx: &Context, redirect: &[String], responses: &[Response]) -> Outcome<()> {
    let targets: Vec<&str> = if redirect.is_empty() {
        vec![ctx.channel.as_str()]
    } else {
        redirect.iter().map(String::as_str).collect()
    };
    for response in responses {
        if let Private(text) = response {
            bot.irc.notice(&ctx.nick, text)?;
            continue
        }
        for target in &targets {
            match response {
                Reply(text)   => bot.irc.msg(target, &format!("{}: {}", ctx.nick, text))?,
                Message(text) => bot.irc.msg(target, text)?,
                Action(text)  => bot.irc.action(target, text)?,
                Private(_)    => ()
            }
        }
    }
    Ok(())
}

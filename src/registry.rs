use multimap::MultiMap;
use std::sync::Arc;

use crate::command::Command;
use crate::error::*;

#[derive(Clone)]
pub struct Registration {
    pub channel: Option<String>,
    pub command: Arc<dyn Command>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub channel: Option<String>,
    pub target:  Option<String>
}

/// Commands and aliases, each either global or scoped to one channel.
#[derive(Default)]
pub struct Registry {
    commands: MultiMap<String, Registration>,
    aliases:  MultiMap<String, Alias>
}

fn scope(channel: Option<&str>) -> Option<String> {
    channel.map(str::to_lowercase)
}

fn in_scope(entry: &Option<String>, channel: &Option<String>) -> bool {
    entry == channel
}

/// Picks the entry scoped to `channel`, else the global one.
fn pick<'a, T, F>(entries: Option<&'a Vec<T>>, channel: &str, scope_of: F) -> Option<&'a T>
where F: Fn(&T) -> &Option<String> {
    let entries = entries?;
    let local = Some(channel.to_lowercase());
    entries.iter().find(|x| in_scope(scope_of(*x), &local))
        .or_else(|| entries.iter().find(|x| scope_of(*x).is_none()))
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every name a command answers to, replacing anything in the same scope.
    pub fn register(&mut self, channel: Option<&str>, command: Arc<dyn Command>) {
        let channel = scope(channel);
        for name in command.cmds() {
            let name = name.to_lowercase();
            self.remove_command(&name, &channel);
            self.commands.insert(name, Registration { channel: channel.clone(), command: command.clone() });
        }
    }

    pub fn unregister(&mut self, channel: Option<&str>, name: &str) -> bool {
        self.remove_command(&name.to_lowercase(), &scope(channel))
    }

    fn remove_command(&mut self, name: &str, channel: &Option<String>) -> bool {
        match self.commands.get_vec_mut(name) {
            None      => false,
            Some(vec) => {
                let before = vec.len();
                vec.retain(|x| !in_scope(&x.channel, channel));
                before != vec.len()
            }
        }
    }

    /// Looks a name up without following aliases.
    pub fn lookup(&self, name: &str, channel: &str) -> Option<Arc<dyn Command>> {
        pick(self.commands.get_vec(&name.to_lowercase()), channel, |x| &x.channel)
            .map(|x| x.command.clone())
    }

    /// The command name an invocation stands for; `None` if an alias disables it.
    pub fn dealias(&self, name: &str, channel: &str) -> Option<String> {
        let name = name.to_lowercase();
        match pick(self.aliases.get_vec(&name), channel, |x| &x.channel) {
            None        => Some(name),
            Some(alias) => alias.target.clone()
        }
    }

    pub fn resolve(&self, name: &str, channel: &str) -> Option<Arc<dyn Command>> {
        self.lookup(&self.dealias(name, channel)?, channel)
    }

    /// Adds an alias. A target that does not currently resolve is refused,
    /// unless the alias is a `None` target that disables the invocation.
    pub fn add_alias(&mut self, channel: Option<&str>, invocation: &str, target: Option<&str>)
    -> Outcome<()> {
        let invocation = invocation.to_lowercase();
        let channel = scope(channel);
        let target = target.map(str::to_lowercase);
        if self.aliases.get_vec(&invocation).map_or(false, |xs| xs.iter().any(|x| in_scope(&x.channel, &channel))) {
            return Err(Error::failed(format!("Ambiguous alias definition for {}.", invocation)))
        }
        if let Some(target) = &target {
            let found = match &channel {
                Some(chan) => self.lookup(target, chan).is_some(),
                None       => self.commands.get_vec(target)
                    .map_or(false, |xs| xs.iter().any(|x| x.channel.is_none()))
            };
            if !found {
                return Err(Error::failed(format!("Unable to find the target command {}.", target)))
            }
        }
        self.aliases.insert(invocation, Alias { channel, target });
        Ok(())
    }

    pub fn remove_alias(&mut self, channel: Option<&str>, invocation: &str) -> bool {
        let channel = scope(channel);
        match self.aliases.get_vec_mut(&invocation.to_lowercase()) {
            None      => false,
            Some(vec) => {
                let before = vec.len();
                vec.retain(|x| !in_scope(&x.channel, &channel));
                before != vec.len()
            }
        }
    }

    /// Aliases defined in exactly this scope, sorted by invocation.
    pub fn aliases(&self, channel: Option<&str>) -> Vec<(String, Option<String>)> {
        let channel = scope(channel);
        let mut found: Vec<(String, Option<String>)> = self.aliases
            .iter_all()
            .flat_map(|(name, xs)| xs.iter()
                .filter(|x| in_scope(&x.channel, &channel))
                .map(move |x| (name.to_owned(), x.target.clone()))
            )
            .collect();
        found.sort();
        found
    }

    pub fn len(&self) -> usize {
        self.commands.iter_all().map(|(_, xs)| xs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

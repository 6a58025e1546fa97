use diesel::prelude::*;
use hashbrown::HashMap;

use super::{Alias, NewAlias};
use super::schema::{channel, command_alias};
use crate::error::*;

/// An alias row with its channel resolved to a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoped {
    pub channel:    Option<String>,
    pub invocation: String,
    pub target:     Option<String>
}

pub fn all(conn: &mut SqliteConnection) -> Outcome<Vec<Scoped>> {
    let names: HashMap<i32, String> = channel::table
        .select((channel::id, channel::name))
        .load::<(i32, String)>(conn)?
        .into_iter()
        .collect();
    let aliases: Vec<Alias> = command_alias::table.order(command_alias::id).load(conn)?;
    Ok(aliases
        .into_iter()
        .map(|alias| Scoped {
            channel:    alias.channel_id.and_then(|id| names.get(&id).cloned()),
            invocation: alias.invocation,
            target:     alias.target
        })
        .collect())
}

fn find(conn: &mut SqliteConnection, channel_id: Option<i32>, invocation: &str)
-> Outcome<Option<Alias>> {
    let query = command_alias::table.filter(command_alias::invocation.eq(invocation));
    Ok(match channel_id {
        Some(id) => query.filter(command_alias::channel_id.eq(id)).first(conn).optional()?,
        None     => query.filter(command_alias::channel_id.is_null()).first(conn).optional()?
    })
}

pub fn add(conn: &mut SqliteConnection, channel_id: Option<i32>, invocation: &str, target: Option<&str>)
-> Outcome<()> {
    if find(conn, channel_id, invocation)?.is_some() {
        return Err(Error::failed(format!("Ambiguous alias definition for {}.", invocation)))
    }
    diesel::insert_into(command_alias::table)
        .values(&NewAlias { channel_id, invocation, target })
        .execute(conn)?;
    Ok(())
}

pub fn delete(conn: &mut SqliteConnection, channel_id: Option<i32>, invocation: &str) -> Outcome<()> {
    let alias = find(conn, channel_id, invocation)?
        .ok_or_else(|| Error::failed(format!("There is no alias {}.", invocation)))?;
    diesel::delete(&alias).execute(conn)?;
    Ok(())
}

use diesel::prelude::*;

use super::{Channel, NewChannel};
use super::schema::channel;
use crate::error::*;

pub fn find(conn: &mut SqliteConnection, name: &str) -> Outcome<Option<Channel>> {
    Ok(channel::table
        .filter(channel::name.eq(name.to_lowercase()))
        .first(conn)
        .optional()?)
}

pub fn get(conn: &mut SqliteConnection, name: &str) -> Outcome<Channel> {
    find(conn, name)?.ok_or_else(|| Error::failed(format!("I don't know the channel {}.", name)))
}

pub fn by_id(conn: &mut SqliteConnection, id: i32) -> Outcome<Channel> {
    Ok(channel::table.find(id).first(conn)?)
}

pub fn all(conn: &mut SqliteConnection) -> Outcome<Vec<Channel>> {
    Ok(channel::table.order(channel::name).load(conn)?)
}

/// Finds a channel, creating it disabled if it is unknown.
pub fn ensure(conn: &mut SqliteConnection, name: &str) -> Outcome<Channel> {
    if let Some(chan) = find(conn, name)? {
        return Ok(chan)
    }
    diesel::insert_into(channel::table)
        .values(&NewChannel { name: &name.to_lowercase(), enabled: false })
        .execute(conn)?;
    get(conn, name)
}

pub fn save(conn: &mut SqliteConnection, chan: &Channel) -> Outcome<()> {
    diesel::update(chan).set(chan).execute(conn)?;
    Ok(())
}

pub fn set_enabled(conn: &mut SqliteConnection, name: &str, enabled: bool) -> Outcome<Channel> {
    let mut chan = ensure(conn, name)?;
    chan.enabled = enabled;
    save(conn, &chan)?;
    Ok(chan)
}

pub fn is_silenced(conn: &mut SqliteConnection, name: &str) -> Outcome<bool> {
    Ok(find(conn, name)?.map_or(false, |chan| chan.silenced))
}

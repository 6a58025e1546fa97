use diesel::prelude::*;

use super::*;
use crate::error::*;
use crate::mask::Hostmask;

pub fn groups(conn: &mut SqliteConnection) -> Outcome<Vec<FlagGroup>> {
    Ok(flag_group::table.order(flag_group::name).load(conn)?)
}

pub fn group(conn: &mut SqliteConnection, name: &str) -> Outcome<FlagGroup> {
    flag_group::table
        .filter(flag_group::name.eq(name))
        .first(conn)
        .optional()?
        .ok_or_else(|| Error::failed(format!("Unknown flag group {}.", name)))
}

pub fn users(conn: &mut SqliteConnection) -> Outcome<Vec<GroupUser>> {
    Ok(flag_group_user::table.order(flag_group_user::id).load(conn)?)
}

pub fn channels(conn: &mut SqliteConnection) -> Outcome<Vec<GroupChannel>> {
    Ok(flag_group_channel::table.order(flag_group_channel::id).load(conn)?)
}

pub fn add_group(conn: &mut SqliteConnection, name: &str, flags: &str, deny: bool)
-> Outcome<FlagGroup> {
    let exists = flag_group::table
        .filter(flag_group::name.eq(name))
        .count()
        .get_result::<i64>(conn)?;
    if exists > 0 {
        return Err(Error::failed(format!("Flag group {} already exists.", name)))
    }
    diesel::insert_into(flag_group::table)
        .values(&NewFlagGroup { name, protected: false, deny, flags })
        .execute(conn)?;
    group(conn, name)
}

pub fn delete_group(conn: &mut SqliteConnection, name: &str) -> Outcome<()> {
    let target = group(conn, name)?;
    if target.protected {
        return Err(Error::failed(format!("Flag group {} is protected.", name)))
    }
    diesel::delete(&target).execute(conn)?;
    Ok(())
}

fn find_user(conn: &mut SqliteConnection, group_id: i32, mask: &Hostmask)
-> Outcome<Option<GroupUser>> {
    Ok(flag_group_user::table
        .filter(flag_group_user::group_id.eq(group_id))
        .filter(flag_group_user::nickname.eq(&mask.nick))
        .filter(flag_group_user::username.eq(&mask.user))
        .filter(flag_group_user::hostname.eq(&mask.host))
        .filter(flag_group_user::account.eq(&mask.account))
        .first(conn)
        .optional()?)
}

pub fn add_user(conn: &mut SqliteConnection, name: &str, mask: &Hostmask, protected: bool)
-> Outcome<()> {
    let target = group(conn, name)?;
    mask.compile()?;
    if find_user(conn, target.id, mask)?.is_some() {
        return Err(Error::failed(format!("{} is already in {}.", mask, name)))
    }
    diesel::insert_into(flag_group_user::table)
        .values(&NewGroupUser {
            group_id:  target.id,
            nickname:  &mask.nick,
            username:  &mask.user,
            hostname:  &mask.host,
            account:   &mask.account,
            protected
        })
        .execute(conn)?;
    Ok(())
}

pub fn delete_user(conn: &mut SqliteConnection, name: &str, mask: &Hostmask) -> Outcome<()> {
    let target = group(conn, name)?;
    let row = find_user(conn, target.id, mask)?
        .ok_or_else(|| Error::failed(format!("{} is not in {}.", mask, name)))?;
    if row.protected {
        return Err(Error::failed(format!("{} is protected in {}.", mask, name)))
    }
    diesel::delete(&row).execute(conn)?;
    Ok(())
}

fn find_channel(conn: &mut SqliteConnection, group_id: i32, channel_id: i32)
-> Outcome<Option<GroupChannel>> {
    Ok(flag_group_channel::table
        .filter(flag_group_channel::group_id.eq(group_id))
        .filter(flag_group_channel::channel_id.eq(channel_id))
        .first(conn)
        .optional()?)
}

pub fn add_channel(conn: &mut SqliteConnection, name: &str, chan: &str) -> Outcome<()> {
    let target = group(conn, name)?;
    let chan = super::channel::ensure(conn, chan)?;
    if find_channel(conn, target.id, chan.id)?.is_some() {
        return Err(Error::failed(format!("{} is already in {}.", chan.name, name)))
    }
    diesel::insert_into(flag_group_channel::table)
        .values(&NewGroupChannel { group_id: target.id, channel_id: chan.id, protected: false })
        .execute(conn)?;
    Ok(())
}

pub fn delete_channel(conn: &mut SqliteConnection, name: &str, chan: &str) -> Outcome<()> {
    let target = group(conn, name)?;
    let chan = super::channel::get(conn, chan)?;
    let row = find_channel(conn, target.id, chan.id)?
        .ok_or_else(|| Error::failed(format!("{} is not in {}.", chan.name, name)))?;
    if row.protected {
        return Err(Error::failed(format!("{} is protected in {}.", chan.name, name)))
    }
    diesel::delete(&row).execute(conn)?;
    Ok(())
}

/// Binds the configured owner to the protected `owner` group, once.
pub fn bootstrap_owner(conn: &mut SqliteConnection, owner: &str) -> Outcome<bool> {
    let mask = Hostmask::parse(owner)
        .ok_or_else(|| Error::throw(format!("OWNER is not a valid mask: {}", owner)))?;
    let target = group(conn, "owner")?;
    if find_user(conn, target.id, &mask)?.is_some() {
        return Ok(false)
    }
    add_user(conn, "owner", &mask, true)?;
    Ok(true)
}

use diesel::prelude::*;

use super::{NewSite, Site};
use super::schema::mediawiki_site;
use crate::error::*;

pub fn by_id(conn: &mut SqliteConnection, id: i32) -> Outcome<Site> {
    Ok(mediawiki_site::table.find(id).first(conn)?)
}

pub fn find(conn: &mut SqliteConnection, name: &str) -> Outcome<Option<Site>> {
    Ok(mediawiki_site::table
        .filter(mediawiki_site::name.eq(name))
        .first(conn)
        .optional()?)
}

pub fn all(conn: &mut SqliteConnection) -> Outcome<Vec<Site>> {
    Ok(mediawiki_site::table.order(mediawiki_site::id).load(conn)?)
}

pub fn get(conn: &mut SqliteConnection, name: &str) -> Outcome<Site> {
    find(conn, name)?.ok_or_else(|| Error::failed(format!("I don't know the wiki {}.", name)))
}

pub fn add(conn: &mut SqliteConnection, site: &NewSite) -> Outcome<Site> {
    if find(conn, site.name)?.is_some() {
        return Err(Error::failed(format!("The wiki {} already exists.", site.name)))
    }
    diesel::insert_into(mediawiki_site::table).values(site).execute(conn)?;
    get(conn, site.name)
}

/// Adds a site unless one by that name exists. Returns whether it was added.
pub fn ensure(conn: &mut SqliteConnection, site: &NewSite) -> Outcome<bool> {
    if find(conn, site.name)?.is_some() {
        return Ok(false)
    }
    add(conn, site)?;
    Ok(true)
}

/// The site a channel talks to: its own base wiki, else the first one configured.
pub fn for_channel(conn: &mut SqliteConnection, base_wiki: Option<i32>) -> Outcome<Site> {
    match base_wiki {
        Some(id) => by_id(conn, id),
        None     => all(conn)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::failed("No wiki is configured for this channel."))
    }
}

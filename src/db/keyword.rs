use diesel::prelude::*;

use super::{Keyword, NewKeyword};
use super::schema::keyword;
use crate::error::*;

pub fn find(conn: &mut SqliteConnection, name: &str) -> Outcome<Option<Keyword>> {
    Ok(keyword::table
        .filter(keyword::name.eq(name.to_lowercase()))
        .first(conn)
        .optional()?)
}

pub fn set(conn: &mut SqliteConnection, name: &str, response: &str, action: bool) -> Outcome<()> {
    let name = name.to_lowercase();
    diesel::delete(keyword::table.filter(keyword::name.eq(&name))).execute(conn)?;
    diesel::insert_into(keyword::table)
        .values(&NewKeyword { name: &name, response, action })
        .execute(conn)?;
    Ok(())
}

pub fn delete(conn: &mut SqliteConnection, name: &str) -> Outcome<bool> {
    let deleted = diesel::delete(keyword::table.filter(keyword::name.eq(name.to_lowercase())))
        .execute(conn)?;
    Ok(deleted > 0)
}

use chrono::NaiveDateTime;
use diesel::prelude::*;
use hashbrown::HashSet;

use super::{Item, NewIgnoredPage, NewItem, NewWatcher, Watcher};
use super::schema::{category_watcher, category_watcher_item, ignored_page};
use crate::error::*;

pub fn by_id(conn: &mut SqliteConnection, id: i32) -> Outcome<Watcher> {
    Ok(category_watcher::table.find(id).first(conn)?)
}

pub fn find(conn: &mut SqliteConnection, channel_id: i32, keyword: &str) -> Outcome<Option<Watcher>> {
    Ok(category_watcher::table
        .filter(category_watcher::channel_id.eq(channel_id))
        .filter(category_watcher::keyword.eq(keyword.to_lowercase()))
        .first(conn)
        .optional()?)
}

pub fn get(conn: &mut SqliteConnection, channel_id: i32, keyword: &str) -> Outcome<Watcher> {
    find(conn, channel_id, keyword)?
        .ok_or_else(|| Error::failed(format!("There is no category watcher called {}.", keyword)))
}

pub fn for_channel(conn: &mut SqliteConnection, channel_id: i32) -> Outcome<Vec<Watcher>> {
    Ok(category_watcher::table
        .filter(category_watcher::channel_id.eq(channel_id))
        .order(category_watcher::keyword)
        .load(conn)?)
}

pub fn enabled(conn: &mut SqliteConnection) -> Outcome<Vec<Watcher>> {
    Ok(category_watcher::table
        .filter(category_watcher::enabled.eq(true))
        .order((category_watcher::priority.desc(), category_watcher::id))
        .load(conn)?)
}

pub fn add(conn: &mut SqliteConnection, new: &NewWatcher) -> Outcome<Watcher> {
    let keyword = new.keyword.to_lowercase();
    if find(conn, new.channel_id, &keyword)?.is_some() {
        return Err(Error::failed(format!("A category watcher called {} already exists.", keyword)))
    }
    let duplicate = category_watcher::table
        .filter(category_watcher::channel_id.eq(new.channel_id))
        .filter(category_watcher::site_id.eq(new.site_id))
        .filter(category_watcher::category.eq(new.category))
        .count()
        .get_result::<i64>(conn)?;
    if duplicate > 0 {
        return Err(Error::failed(format!("{} is already being watched here.", new.category)))
    }
    diesel::insert_into(category_watcher::table)
        .values(&NewWatcher { keyword: &keyword, ..*new })
        .execute(conn)?;
    get(conn, new.channel_id, &keyword)
}

pub fn save(conn: &mut SqliteConnection, watcher: &Watcher) -> Outcome<()> {
    diesel::update(watcher).set(watcher).execute(conn)?;
    Ok(())
}

pub fn items(conn: &mut SqliteConnection, watcher_id: i32) -> Outcome<Vec<Item>> {
    Ok(category_watcher_item::table
        .filter(category_watcher_item::watcher_id.eq(watcher_id))
        .order((category_watcher_item::touched, category_watcher_item::title))
        .load(conn)?)
}

pub fn insert_item(conn: &mut SqliteConnection, watcher_id: i32, title: &str, touched: NaiveDateTime)
-> Outcome<()> {
    diesel::insert_into(category_watcher_item::table)
        .values(&NewItem { watcher_id, title, touched })
        .execute(conn)?;
    Ok(())
}

pub fn delete_items(conn: &mut SqliteConnection, watcher_id: i32, titles: &[String]) -> Outcome<usize> {
    Ok(diesel::delete(category_watcher_item::table
        .filter(category_watcher_item::watcher_id.eq(watcher_id))
        .filter(category_watcher_item::title.eq_any(titles)))
        .execute(conn)?)
}

pub fn ignored(conn: &mut SqliteConnection) -> Outcome<HashSet<String>> {
    Ok(ignored_page::table
        .select(ignored_page::title)
        .load::<String>(conn)?
        .into_iter()
        .collect())
}

pub fn ignore(conn: &mut SqliteConnection, title: &str) -> Outcome<()> {
    diesel::insert_or_ignore_into(ignored_page::table)
        .values(&NewIgnoredPage { title })
        .execute(conn)?;
    Ok(())
}

/// Whether the title was on the list.
pub fn unignore(conn: &mut SqliteConnection, title: &str) -> Outcome<bool> {
    Ok(diesel::delete(ignored_page::table.filter(ignored_page::title.eq(title))).execute(conn)? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn rejects_duplicate_keywords() {
        let (db, _dir) = testing::db();
        let (chan, site) = testing::seed(&db);
        db.transaction(|conn| add(conn, &NewWatcher {
            channel_id: chan, site_id: site, keyword: "Other", category: "Some category"
        })).unwrap();
        let dup = db.transaction(|conn| add(conn, &NewWatcher {
            channel_id: chan, site_id: site, keyword: "other", category: "Another category"
        }));
        assert!(dup.is_err());
    }

    #[test]
    fn rejects_duplicate_categories() {
        let (db, _dir) = testing::db();
        let (chan, site) = testing::seed(&db);
        let dup = db.transaction(|conn| add(conn, &NewWatcher {
            channel_id: chan, site_id: site, keyword: "again", category: testing::CATEGORY
        }));
        assert!(dup.is_err());
    }

    #[test]
    fn items_come_back_oldest_first() {
        let (db, _dir) = testing::db();
        let (chan, _) = testing::seed(&db);
        let watcher = db.read(|conn| get(conn, chan, testing::KEYWORD)).unwrap();
        let old = testing::time(0);
        let new = testing::time(60);
        db.transaction(|conn| {
            insert_item(conn, watcher.id, "B", new)?;
            insert_item(conn, watcher.id, "A", new)?;
            insert_item(conn, watcher.id, "C", old)
        }).unwrap();
        let titles: Vec<String> = db.read(|conn| items(conn, watcher.id)).unwrap()
            .into_iter()
            .map(|x| x.title)
            .collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }
}

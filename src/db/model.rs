use chrono::NaiveDateTime;
use hashbrown::HashSet;

use super::schema::*;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = mediawiki_site)]
pub struct Site {
    pub id:           i32,
    pub name:         String,
    pub api:          String,
    pub article_path: String,
    pub username:     Option<String>,
    pub password:     Option<String>
}

#[derive(Debug, Insertable)]
#[diesel(table_name = mediawiki_site)]
pub struct NewSite<'a> {
    pub name:         &'a str,
    pub api:          &'a str,
    pub article_path: &'a str,
    pub username:     Option<&'a str>,
    pub password:     Option<&'a str>
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, AsChangeset)]
#[diesel(table_name = channel)]
#[diesel(treat_none_as_null = true)]
pub struct Channel {
    pub id:             i32,
    pub name:           String,
    pub enabled:        bool,
    pub silenced:       bool,
    pub autolink:       bool,
    pub long_user_info: bool,
    pub base_wiki_id:   Option<i32>
}

#[derive(Debug, Insertable)]
#[diesel(table_name = channel)]
pub struct NewChannel<'a> {
    pub name:    &'a str,
    pub enabled: bool
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = flag_group)]
pub struct FlagGroup {
    pub id:        i32,
    pub name:      String,
    pub protected: bool,
    pub deny:      bool,
    pub flags:     String
}
impl FlagGroup {
    pub fn flag_set(&self) -> HashSet<char> {
        self.flags.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = flag_group)]
pub struct NewFlagGroup<'a> {
    pub name:      &'a str,
    pub protected: bool,
    pub deny:      bool,
    pub flags:     &'a str
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = flag_group_user)]
pub struct GroupUser {
    pub id:        i32,
    pub group_id:  i32,
    pub nickname:  String,
    pub username:  String,
    pub hostname:  String,
    pub account:   String,
    pub protected: bool
}

#[derive(Debug, Insertable)]
#[diesel(table_name = flag_group_user)]
pub struct NewGroupUser<'a> {
    pub group_id:  i32,
    pub nickname:  &'a str,
    pub username:  &'a str,
    pub hostname:  &'a str,
    pub account:   &'a str,
    pub protected: bool
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = flag_group_channel)]
pub struct GroupChannel {
    pub id:         i32,
    pub group_id:   i32,
    pub channel_id: i32,
    pub protected:  bool
}

#[derive(Debug, Insertable)]
#[diesel(table_name = flag_group_channel)]
pub struct NewGroupChannel {
    pub group_id:   i32,
    pub channel_id: i32,
    pub protected:  bool
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, AsChangeset)]
#[diesel(table_name = category_watcher)]
pub struct Watcher {
    pub id:             i32,
    pub channel_id:     i32,
    pub site_id:        i32,
    pub keyword:        String,
    pub category:       String,
    pub sleep_time:     i32,
    pub enabled:        bool,
    pub show_link:      bool,
    pub show_short_url: bool,
    pub show_wait_time: bool,
    pub delta:          bool,
    pub singular:       String,
    pub plural:         String,
    pub action:         String,
    pub min_wait_time:  i32,
    pub priority:       i32
}

#[derive(Debug, Insertable)]
#[diesel(table_name = category_watcher)]
pub struct NewWatcher<'a> {
    pub channel_id: i32,
    pub site_id:    i32,
    pub keyword:    &'a str,
    pub category:   &'a str
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = category_watcher_item)]
pub struct Item {
    pub id:         i32,
    pub watcher_id: i32,
    pub title:      String,
    pub touched:    NaiveDateTime
}

#[derive(Debug, Insertable)]
#[diesel(table_name = category_watcher_item)]
pub struct NewItem<'a> {
    pub watcher_id: i32,
    pub title:      &'a str,
    pub touched:    NaiveDateTime
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = command_alias)]
pub struct Alias {
    pub id:         i32,
    pub channel_id: Option<i32>,
    pub invocation: String,
    pub target:     Option<String>
}

#[derive(Debug, Insertable)]
#[diesel(table_name = command_alias)]
pub struct NewAlias<'a> {
    pub channel_id: Option<i32>,
    pub invocation: &'a str,
    pub target:     Option<&'a str>
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = keyword)]
pub struct Keyword {
    pub id:       i32,
    pub name:     String,
    pub response: String,
    pub action:   bool
}

#[derive(Debug, Insertable)]
#[diesel(table_name = keyword)]
pub struct NewKeyword<'a> {
    pub name:     &'a str,
    pub response: &'a str,
    pub action:   bool
}

#[derive(Debug, Insertable)]
#[diesel(table_name = ignored_page)]
pub struct NewIgnoredPage<'a> {
    pub title: &'a str
}

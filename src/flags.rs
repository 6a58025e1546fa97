use diesel::SqliteConnection;
use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::context::Context;
use crate::db::{self, Db};
use crate::error::*;
use crate::mask::{Identity, UserMask};

pub const OWNER: char = 'O';
pub const SUPERUSER: char = 'P';
pub const ACCESS: char = 'A';
pub const CONFIG: char = 'C';
pub const STANDARD: char = 'S';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name:  String,
    pub deny:  bool,
    pub flags: HashSet<char>
}

/// A snapshot of every flag group association.
#[derive(Debug, Default)]
pub struct Rules {
    groups:   Vec<Group>,
    users:    Vec<(UserMask, usize)>,
    channels: Vec<(String, usize)>
}

impl Rules {
    pub fn load(conn: &mut SqliteConnection) -> Outcome<Self> {
        let mut rules = Self::default();
        let mut index = HashMap::new();
        for group in db::access::groups(conn)? {
            index.insert(group.id, rules.groups.len());
            rules.groups.push(Group { flags: group.flag_set(), name: group.name, deny: group.deny });
        }
        for user in db::access::users(conn)? {
            if let Some(&i) = index.get(&user.group_id) {
                let mask = UserMask::new(&user.nickname, &user.username, &user.hostname, &user.account)?;
                rules.users.push((mask, i));
            }
        }
        let names: HashMap<i32, String> = db::channel::all(conn)?
            .into_iter()
            .map(|chan| (chan.id, chan.name))
            .collect();
        for assoc in db::access::channels(conn)? {
            if let (Some(&i), Some(name)) = (index.get(&assoc.group_id), names.get(&assoc.channel_id)) {
                rules.channels.push((name.to_owned(), i));
            }
        }
        Ok(rules)
    }

    #[cfg(test)]
    pub fn build(groups: Vec<Group>, users: Vec<(UserMask, usize)>, channels: Vec<(String, usize)>) -> Self {
        Self { groups, users, channels }
    }

    fn user_groups(&self, id: &Identity) -> Vec<usize> {
        self.users.iter().filter(|(mask, _)| mask.matches(id)).map(|&(_, i)| i).collect()
    }

    fn channel_groups(&self, channel: &str) -> Vec<usize> {
        self.channels.iter().filter(|(name, _)| name.eq_ignore_ascii_case(channel)).map(|&(_, i)| i).collect()
    }

    fn compose<I: IntoIterator<Item = usize>>(&self, matched: I) -> HashSet<char> {
        let mut allow = HashSet::new();
        let mut deny = HashSet::new();
        for i in matched {
            let group = &self.groups[i];
            if group.deny {
                deny.extend(group.flags.iter().cloned());
            } else {
                allow.extend(group.flags.iter().cloned());
            }
        }
        allow.difference(&deny).cloned().collect()
    }

    pub fn user(&self, id: &Identity) -> HashSet<char> {
        self.compose(self.user_groups(id))
    }

    pub fn channel(&self, channel: &str) -> HashSet<char> {
        self.compose(self.channel_groups(channel))
    }

    /// Flags in effect for someone speaking in a channel: user and channel groups together.
    pub fn effective(&self, id: &Identity, channel: &str) -> HashSet<char> {
        self.compose(self.user_groups(id).into_iter().chain(self.channel_groups(channel)))
    }
}

pub fn grants(flags: &HashSet<char>, flag: char) -> bool {
    flags.contains(&flag) || flags.contains(&OWNER)
}

/// Lazily loaded access rules, dropped wholesale whenever an association changes.
pub struct Flags {
    db:         Db,
    generation: AtomicU64,
    cache:      RwLock<Option<Arc<Rules>>>
}

impl Flags {
    pub fn new(db: Db) -> Self {
        Self { db, generation: AtomicU64::new(0), cache: RwLock::new(None) }
    }

    /// A snapshot loaded across an invalidation is returned but never cached.
    pub fn rules(&self) -> Outcome<Arc<Rules>> {
        if let Some(rules) = self.cache.read().as_ref() {
            return Ok(rules.clone())
        }
        let generation = self.generation.load(Ordering::SeqCst);
        let rules = Arc::new(self.db.read(Rules::load)?);
        let mut cache = self.cache.write();
        if self.generation.load(Ordering::SeqCst) == generation {
            *cache = Some(rules.clone());
        }
        Ok(rules)
    }

    pub fn invalidate(&self) {
        let mut cache = self.cache.write();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *cache = None;
    }

    pub fn effective(&self, ctx: &Context) -> Outcome<HashSet<char>> {
        Ok(self.rules()?.effective(&ctx.identity(), &ctx.channel))
    }

    pub fn authorized(&self, ctx: &Context, flag: char) -> Outcome<bool> {
        Ok(grants(&self.effective(ctx)?, flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Hostmask;
    use crate::testing;

    fn group(name: &str, deny: bool, flags: &str) -> Group {
        Group { name: name.to_owned(), deny, flags: flags.chars().collect() }
    }

    fn any() -> UserMask {
        UserMask::new("*", "*", "*", "*").unwrap()
    }

    fn alice() -> Identity<'static> {
        Identity { nick: Some("alice"), user: Some("al"), host: Some("example.org"), account: None }
    }

    fn set(s: &str) -> HashSet<char> {
        s.chars().collect()
    }

    #[test]
    fn unions_allow_groups() {
        let rules = Rules::build(
            vec![group("a", false, "S"), group("b", false, "C")],
            vec![(any(), 0), (UserMask::new("alice", "*", "*", "*").unwrap(), 1)],
            vec![]
        );
        assert_eq!(rules.user(&alice()), set("SC"));
    }

    #[test]
    fn deny_groups_subtract() {
        let rules = Rules::build(
            vec![group("a", false, "SC"), group("b", true, "C")],
            vec![(any(), 0), (any(), 1)],
            vec![]
        );
        assert_eq!(rules.user(&alice()), set("S"));
    }

    #[test]
    fn order_does_not_matter() {
        let groups = vec![group("a", false, "SC"), group("b", true, "C")];
        let forward = Rules::build(groups.clone(), vec![(any(), 0), (any(), 1)], vec![]);
        let backward = Rules::build(groups, vec![(any(), 1), (any(), 0)], vec![]);
        assert_eq!(forward.user(&alice()), backward.user(&alice()));
    }

    #[test]
    fn unmatched_rules_grant_nothing() {
        let rules = Rules::build(
            vec![group("a", false, "P")],
            vec![(UserMask::new("bob", "*", "*", "*").unwrap(), 0)],
            vec![]
        );
        assert!(rules.user(&alice()).is_empty());
    }

    #[test]
    fn channels_match_exactly() {
        let rules = Rules::build(vec![group("a", false, "C")], vec![], vec![("#help".to_owned(), 0)]);
        assert_eq!(rules.channel("#HELP"), set("C"));
        assert!(rules.channel("#help-more").is_empty());
    }

    #[test]
    fn channel_deny_applies_to_users() {
        let rules = Rules::build(
            vec![group("a", false, "SC"), group("b", true, "C")],
            vec![(any(), 0)],
            vec![("#quiet".to_owned(), 1)]
        );
        assert_eq!(rules.effective(&alice(), "#quiet"), set("S"));
        assert_eq!(rules.effective(&alice(), "#loud"), set("SC"));
    }

    #[test]
    fn owner_grants_everything() {
        assert!(grants(&set("O"), CONFIG));
        assert!(!grants(&set("S"), CONFIG));
    }

    #[test]
    fn invalidation_picks_up_changes() {
        let (db, _dir) = testing::db();
        let flags = Flags::new(db.clone());
        let ctx = Context::mock("#test", "Alice");
        assert!(!flags.authorized(&ctx, CONFIG).unwrap());

        let mask = Hostmask::parse("alice").unwrap();
        db.transaction(|conn| db::access::add_user(conn, "owner", &mask, false)).unwrap();
        assert!(!flags.authorized(&ctx, CONFIG).unwrap());

        flags.invalidate();
        assert!(flags.authorized(&ctx, CONFIG).unwrap());
    }

    #[test]
    fn concurrent_loads_do_not_outlive_invalidation() {
        let (db, _dir) = testing::db();
        let flags = Flags::new(db.clone());
        for i in 0..50 {
            let nick = format!("user{}", i);
            let ctx = Context::mock("#test", &nick);
            flags.invalidate();
            std::thread::scope(|s| {
                let reader = s.spawn(|| flags.rules().map(|_| ()));
                let mask = Hostmask::parse(&nick).unwrap();
                db.transaction(|conn| db::access::add_user(conn, "owner", &mask, false)).unwrap();
                flags.invalidate();
                reader.join().unwrap().unwrap();
            });
            assert!(flags.authorized(&ctx, CONFIG).unwrap(), "{} was not picked up", nick);
        }
    }

    #[test]
    fn everyone_is_standard() {
        let (db, _dir) = testing::db();
        let flags = Flags::new(db);
        assert!(flags.authorized(&Context::mock("#test", "nobody"), STANDARD).unwrap());
    }
}

use chrono::{Duration, NaiveDateTime};

use crate::db::{Item, Site, Watcher};
use crate::shortener::Shortener;
use crate::util;

const LINK: &str = "[[{0}]] ";
const SHORT_URL: &str = "{1} ";
const WAIT_TIME: &str = "{2}";

/// Per-item template from the watcher's display flags.
pub fn template(watcher: &Watcher) -> String {
    let mut format = String::new();
    let mut keep_trailing = false;
    if watcher.show_link {
        format.push_str(LINK);
    }
    if watcher.show_short_url {
        format.push_str(SHORT_URL);
        keep_trailing = true;
    }
    if watcher.show_wait_time {
        format.push_str(WAIT_TIME);
        keep_trailing = false;
    }
    if keep_trailing {
        format
    } else {
        format.trim().to_owned()
    }
}

pub fn item(
    watcher: &Watcher,
    site: &Site,
    shortener: &dyn Shortener,
    template: &str,
    entry: &Item,
    now: NaiveDateTime
) -> String {
    let short = if watcher.show_short_url {
        shortener.shorten(&util::article_url(&site.article_path, &entry.title))
    } else {
        String::new()
    };
    let waiting = now.signed_duration_since(entry.touched);
    let wait = if watcher.show_wait_time && waiting > Duration::minutes(i64::from(watcher.min_wait_time)) {
        format!("(waiting {})", util::wait_time(waiting))
    } else {
        String::new()
    };
    template
        .replace("{0}", &entry.title)
        .replace("{1}", &short)
        .replace("{2}", &wait)
}

/// The channel message for a set of items. `total` is the category's full size.
pub fn compile(
    watcher: &Watcher,
    site: &Site,
    shortener: &dyn Shortener,
    items: &[Item],
    total: i64,
    now: NaiveDateTime
) -> String {
    if items.is_empty() {
        return format!("0 {} {}.", watcher.plural, util::fill(&watcher.action, &watcher.category))
    }
    let template = template(watcher);
    let list: Vec<String> = items
        .iter()
        .map(|entry| item(watcher, site, shortener, &template, entry, now))
        .collect();
    let noun = if list.len() == 1 { &watcher.singular } else { &watcher.plural };
    let action = format!(" {}", util::fill(&watcher.action, &watcher.category));
    format!("{} {}{}: {}", total, noun, action.trim_end(), list.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortener;
    use crate::testing;

    struct Short;
    impl Shortener for Short {
        fn shorten(&self, url: &str) -> String {
            format!("short({})", url.rsplit('/').next().unwrap_or(url))
        }
    }

    fn watcher(link: bool, short: bool, wait: bool) -> Watcher {
        Watcher {
            show_link:      link,
            show_short_url: short,
            show_wait_time: wait,
            ..testing::watcher()
        }
    }

    fn entry(title: &str, minutes_ago: i64) -> Item {
        Item { id: 0, watcher_id: 1, title: title.to_owned(), touched: testing::time(-minutes_ago) }
    }

    fn now() -> NaiveDateTime {
        testing::time(0)
    }

    #[test]
    fn templates_follow_flags() {
        assert_eq!(template(&watcher(true, true, true)), "[[{0}]] {1} {2}");
        assert_eq!(template(&watcher(true, false, false)), "[[{0}]]");
        assert_eq!(template(&watcher(true, true, false)), "[[{0}]] {1} ");
        assert_eq!(template(&watcher(false, false, true)), "{2}");
    }

    #[test]
    fn shows_wait_after_minimum() {
        let mut w = watcher(true, false, true);
        w.min_wait_time = 10;
        let site = testing::site();
        let t = template(&w);
        assert_eq!(item(&w, &site, &shortener::Identity, &t, &entry("A", 5), now()), "[[A]] ");
        assert_eq!(item(&w, &site, &shortener::Identity, &t, &entry("A", 75), now()), "[[A]] (waiting 01:15:00)");
    }

    #[test]
    fn shows_days() {
        let w = watcher(false, false, true);
        let t = template(&w);
        let text = item(&w, &testing::site(), &shortener::Identity, &t, &entry("A", 60 * 24 * 3 + 1), now());
        assert_eq!(text, "(waiting 3d 00:01:00)");
    }

    #[test]
    fn uses_short_urls() {
        let w = watcher(true, true, false);
        let t = template(&w);
        assert_eq!(item(&w, &testing::site(), &Short, &t, &entry("Foo bar", 0), now()), "[[Foo bar]] short(Foo_bar) ");
    }

    #[test]
    fn compiles_message() {
        let w = watcher(true, false, false);
        let items = vec![entry("A", 1), entry("B", 1)];
        assert_eq!(
            compile(&w, &testing::site(), &shortener::Identity, &items, 7, now()),
            format!("7 items in {}: [[A]], [[B]]", w.category)
        );
    }

    #[test]
    fn singular_for_one_item() {
        let w = watcher(true, false, false);
        assert_eq!(
            compile(&w, &testing::site(), &shortener::Identity, &[entry("A", 1)], 1, now()),
            format!("1 item in {}: [[A]]", w.category)
        );
    }

    #[test]
    fn empty_action_has_no_trailing_space() {
        let mut w = watcher(true, false, false);
        w.action = String::new();
        assert_eq!(compile(&w, &testing::site(), &shortener::Identity, &[entry("A", 1)], 1, now()), "1 item: [[A]]");
    }

    #[test]
    fn zero_items() {
        let w = watcher(true, true, true);
        assert_eq!(
            compile(&w, &testing::site(), &shortener::Identity, &[], 0, now()),
            format!("0 items in {}.", w.category)
        );
    }
}

use chrono::Duration;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::string::ToString;

const PATH: &AsciiSet = &CONTROLS
    .add(b' ').add(b'"').add(b'#').add(b'%').add(b'<').add(b'>').add(b'?')
    .add(b'`').add(b'{').add(b'}').add(b'[').add(b']').add(b'|').add(b'\\').add(b'^');

const QUERY: &AsciiSet = &PATH.add(b'&').add(b'=').add(b'+').add(b'/').add(b':');

pub fn encode(s: &str) -> String {
    utf8_percent_encode(s, QUERY).to_string()
}

pub fn own(xs: &[&str]) -> Vec<String> {
    xs.iter().map(ToString::to_string).collect()
}

/// Substitutes `{0}` in a template.
pub fn fill(template: &str, value: &str) -> String {
    template.replace("{0}", value)
}

/// Article URL for a page title given a site's `/wiki/$1`-style article path.
pub fn article_url(article_path: &str, title: &str) -> String {
    let page = utf8_percent_encode(&title.replace(' ', "_"), PATH).to_string();
    if article_path.contains("$1") {
        article_path.replace("$1", &page)
    } else {
        fill(article_path, &page)
    }
}

/// `hh:mm:ss`, prefixed with `Nd ` once at least a day has passed.
pub fn wait_time(dur: Duration) -> String {
    let secs = dur.num_seconds().max(0);
    let (days, rest) = (secs / 86_400, secs % 86_400);
    let clock = format!("{:02}:{:02}:{:02}", rest / 3600, rest % 3600 / 60, rest % 60);
    if days > 0 {
        format!("{}d {}", days, clock)
    } else {
        clock
    }
}

pub fn plural(amount: usize, singular: &str, plural: &str) -> String {
    match amount {
        1 => format!("{} {}", amount, singular),
        _ => format!("{} {}", amount, plural)
    }
}

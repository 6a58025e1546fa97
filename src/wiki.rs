use chrono::{DateTime, NaiveDateTime};
use hashbrown::HashMap;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap as StdMap;
use std::time::Duration;

use crate::db::Site;
use crate::error::*;

const BATCH: usize = 50;

/// The parts of the MediaWiki API the bot relies on.
pub trait Wiki: Send + Sync {
    fn pages_in_category(&self, site: &Site, category: &str) -> Outcome<Vec<String>>;
    /// Last-touched times; titles the wiki doesn't know are left out.
    fn touched(&self, site: &Site, titles: &[String]) -> Outcome<HashMap<String, NaiveDateTime>>;
    fn category_size(&self, site: &Site, category: &str) -> Outcome<i64>;
    /// `None` for a user that doesn't exist.
    fn edit_count(&self, site: &Site, user: &str) -> Outcome<Option<i64>>;
}

pub fn category_title(category: &str) -> String {
    if category.to_lowercase().starts_with("category:") {
        category.to_owned()
    } else {
        format!("Category:{}", category)
    }
}

#[derive(Debug, Deserialize)]
struct Response<Q> {
    query:    Option<Q>,
    #[serde(rename = "continue")]
    continues: Option<StdMap<String, String>>,
    error:    Option<ApiError>
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: String
}

#[derive(Debug, Deserialize)]
struct Members {
    categorymembers: Vec<Titled>
}

#[derive(Debug, Deserialize)]
struct Titled {
    title: String
}

#[derive(Debug, Deserialize)]
struct Pages {
    #[serde(default)]
    pages: Vec<Page>
}

#[derive(Debug, Deserialize)]
struct Page {
    title:        String,
    #[serde(default)]
    missing:      bool,
    touched:      Option<String>,
    categoryinfo: Option<CategoryInfo>
}

#[derive(Debug, Deserialize)]
struct CategoryInfo {
    size: i64
}

#[derive(Debug, Deserialize)]
struct Users {
    users: Vec<User>
}

#[derive(Debug, Deserialize)]
struct User {
    #[serde(default)]
    missing:   bool,
    #[serde(default)]
    invalid:   bool,
    editcount: Option<i64>
}

pub struct MediaWikiApi {
    client: Client
}

impl MediaWikiApi {
    pub fn new(user_agent: &str) -> Outcome<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    fn query<Q: DeserializeOwned>(&self, site: &Site, params: &[(&str, &str)]) -> Outcome<Response<Q>> {
        let res: Response<Q> = self.client
            .get(&site.api)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()?
            .error_for_status()?
            .json()?;
        if let Some(e) = &res.error {
            return Err(Api(failure::err_msg(format!("{}: {}", e.code, e.info))))
        }
        Ok(res)
    }
}

impl Wiki for MediaWikiApi {
    fn pages_in_category(&self, site: &Site, category: &str) -> Outcome<Vec<String>> {
        let title = category_title(category);
        let mut pages = Vec::new();
        let mut cont: Option<String> = None;
        loop {
            let mut params = vec![
                ("list", "categorymembers"),
                ("cmtitle", title.as_str()),
                ("cmprop", "title"),
                ("cmlimit", "max")
            ];
            if let Some(c) = &cont {
                params.push(("cmcontinue", c.as_str()));
            }
            let res: Response<Members> = self.query(site, &params)?;
            if let Some(query) = res.query {
                pages.extend(query.categorymembers.into_iter().map(|x| x.title));
            }
            cont = res.continues.and_then(|mut c| c.remove("cmcontinue"));
            if cont.is_none() {
                return Ok(pages)
            }
        }
    }

    fn touched(&self, site: &Site, titles: &[String]) -> Outcome<HashMap<String, NaiveDateTime>> {
        let mut found = HashMap::new();
        for chunk in titles.chunks(BATCH) {
            let joined = chunk.join("|");
            let res: Response<Pages> = self.query(site, &[("prop", "info"), ("titles", joined.as_str())])?;
            for page in res.query.map(|q| q.pages).unwrap_or_default() {
                if let (false, Some(touched)) = (page.missing, page.touched) {
                    let time = DateTime::parse_from_rfc3339(&touched)?.naive_utc();
                    found.insert(page.title, time);
                }
            }
        }
        Ok(found)
    }

    fn category_size(&self, site: &Site, category: &str) -> Outcome<i64> {
        let title = category_title(category);
        let res: Response<Pages> = self.query(site, &[("prop", "categoryinfo"), ("titles", title.as_str())])?;
        Ok(res.query
            .and_then(|q| q.pages.into_iter().next())
            .and_then(|page| page.categoryinfo)
            .map_or(0, |info| info.size))
    }

    fn edit_count(&self, site: &Site, user: &str) -> Outcome<Option<i64>> {
        let res: Response<Users> = self.query(site, &[
            ("list", "users"), ("ususers", user), ("usprop", "editcount")
        ])?;
        Ok(res.query
            .and_then(|q| q.users.into_iter().next())
            .filter(|u| !u.missing && !u.invalid)
            .and_then(|u| u.editcount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_categories() {
        assert_eq!(category_title("Pending AfC submissions"), "Category:Pending AfC submissions");
        assert_eq!(category_title("category:Foo"), "category:Foo");
    }

    #[test]
    fn reads_continuations() {
        let body = r#"{
            "batchcomplete": true,
            "continue": { "cmcontinue": "page|ABC|123", "continue": "-||" },
            "query": { "categorymembers": [ { "ns": 0, "title": "Foo" }, { "ns": 2, "title": "User:Bar" } ] }
        }"#;
        let res: Response<Members> = serde_json::from_str(body).unwrap();
        let titles: Vec<String> = res.query.unwrap().categorymembers.into_iter().map(|x| x.title).collect();
        assert_eq!(titles, vec!["Foo", "User:Bar"]);
        assert_eq!(res.continues.unwrap().get("cmcontinue").map(String::as_str), Some("page|ABC|123"));
    }

    #[test]
    fn reads_missing_users() {
        let body = r#"{ "query": { "users": [ { "name": "Nobody", "missing": true } ] } }"#;
        let res: Response<Users> = serde_json::from_str(body).unwrap();
        assert!(res.query.unwrap().users[0].missing);
    }

    #[test]
    fn reads_api_errors() {
        let body = r#"{ "error": { "code": "badvalue", "info": "Unrecognized value" } }"#;
        let res: Response<Users> = serde_json::from_str(body).unwrap();
        assert_eq!(res.error.unwrap().code, "badvalue");
    }
}

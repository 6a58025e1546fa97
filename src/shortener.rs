use hashbrown::HashMap;
use parking_lot::Mutex;
use reqwest::blocking::Client;
use std::time::Duration;

use crate::error::*;
use crate::util;

pub trait Shortener: Send + Sync {
    /// Never fails: anything that goes wrong yields the long URL.
    fn shorten(&self, url: &str) -> String;
}

/// Leaves URLs as they are.
pub struct Identity;

impl Shortener for Identity {
    fn shorten(&self, url: &str) -> String {
        url.to_owned()
    }
}

/// A plain-text shortening service: `GET <prefix><encoded url>` answers with the short URL.
pub struct HttpShortener {
    client: Client,
    prefix: String,
    memo:   Mutex<HashMap<String, String>>
}

impl HttpShortener {
    pub fn new(prefix: &str, user_agent: &str) -> Outcome<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, prefix: prefix.to_owned(), memo: Mutex::new(HashMap::new()) })
    }

    fn request(&self, url: &str) -> Outcome<String> {
        let short = self.client
            .get(&format!("{}{}", self.prefix, util::encode(url)))
            .send()?
            .error_for_status()?
            .text()?;
        let short = short.trim();
        if short.starts_with("http") {
            Ok(short.to_owned())
        } else {
            Err(Error::throw(format!("unexpected shortener response: {}", short)))
        }
    }
}

impl Shortener for HttpShortener {
    fn shorten(&self, url: &str) -> String {
        if let Some(short) = self.memo.lock().get(url) {
            return short.to_owned()
        }
        match self.request(url) {
            Ok(short) => {
                self.memo.lock().insert(url.to_owned(), short.clone());
                short
            },
            Err(e) => {
                tracing::warn!("Could not shorten {}: {}", url, e);
                url.to_owned()
            }
        }
    }
}

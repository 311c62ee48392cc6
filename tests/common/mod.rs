#![allow(dead_code)]

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use futures::future::{FutureExt, LocalBoxFuture};
use passlist::core::{
    CandidateSource, HashMethod, SchemaConfig, SiteConfig, SiteFetcher, SourceError,
};

pub const SECRET: &str = "hunter2";

pub fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn chars(s: &str) -> impl Iterator<Item = KeyEvent> + '_ {
    s.chars().map(|c| press(KeyCode::Char(c)))
}

pub fn site(schema: &str) -> SiteConfig {
    SiteConfig {
        schema: schema.to_string(),
        ..SiteConfig::default()
    }
}

pub fn hashed_name(seed: char) -> String {
    std::iter::repeat(seed).take(64).collect()
}

/// Config store with a few plain sites, one hashed site, and sites that
/// only unlock with [`SECRET`].
pub struct FakeSource {
    pub sites: BTreeMap<String, SiteConfig>,
    pub schemata: BTreeMap<String, SchemaConfig>,
    pub locked: BTreeMap<String, SiteConfig>,
}

impl Default for FakeSource {
    fn default() -> Self {
        let mut sites = BTreeMap::new();
        sites.insert("apple".to_string(), site("32-printable"));
        sites.insert("apply".to_string(), site("32-printable"));
        sites.insert(
            "banana".to_string(),
            SiteConfig {
                method: HashMethod::Skein,
                increment: Some(3),
                ..site("words")
            },
        );
        sites.insert(hashed_name('a'), site("32-printable"));

        let mut schemata = BTreeMap::new();
        schemata.insert(
            "32-printable".to_string(),
            SchemaConfig {
                definition: "[32, printable]".to_string(),
                description: None,
            },
        );
        schemata.insert(
            "words".to_string(),
            SchemaConfig {
                definition: "[4, word]".to_string(),
                description: Some("diceware".to_string()),
            },
        );

        let mut locked = BTreeMap::new();
        locked.insert("banana2".to_string(), site("words"));
        locked.insert("cherry".to_string(), site("32-printable"));

        Self {
            sites,
            schemata,
            locked,
        }
    }
}

impl CandidateSource for FakeSource {
    fn all_sites(&self) -> Result<BTreeMap<String, SiteConfig>, SourceError> {
        Ok(self.sites.clone())
    }

    fn all_schemata(&self) -> Result<BTreeMap<String, SchemaConfig>, SourceError> {
        Ok(self.schemata.clone())
    }

    fn site(&self, name: &str, secret: &str) -> Result<SiteConfig, SourceError> {
        if let Some(site) = self.sites.get(name) {
            return Ok(site.clone());
        }
        if secret != SECRET {
            return Err(SourceError::BadSecret);
        }
        self.locked
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(name.to_string()))
    }
}

/// Remote site list.
pub enum FakeFetcher {
    /// Resolves immediately with these names.
    Ready(Vec<String>),
    /// Fails immediately.
    Failing(String),
    /// Never resolves.
    Stuck,
}

impl SiteFetcher for FakeFetcher {
    fn fetch_site_names(&self) -> LocalBoxFuture<'_, Result<Vec<String>, SourceError>> {
        match self {
            FakeFetcher::Ready(names) => {
                let names = names.clone();
                async move { Ok(names) }.boxed_local()
            }
            FakeFetcher::Failing(msg) => {
                let msg = msg.clone();
                async move { Err(SourceError::Other(msg)) }.boxed_local()
            }
            FakeFetcher::Stuck => futures::future::pending().boxed_local(),
        }
    }
}

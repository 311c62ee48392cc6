//! Two-heading front end: sites and schemata.

use std::collections::{BTreeMap, HashSet};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use futures::future::{abortable, Aborted};

use super::context::UiContext;
use super::list::FilterableList;
use crate::config::Config;
use crate::core::{
    is_likely_hashed_label, load_labels, save_labels, BlobError, BlobStore, CandidateSource, Row,
    SchemaConfig, SecretPrompt, SiteConfig, SiteFetcher, SourceError,
};

/// Prompt shown before unlocking remotely listed sites.
pub const HASHED_SITES_PROMPT: &str = "Password for hashed sites:";

/// Which list has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heading {
    /// Site list.
    #[default]
    Sites,
    /// Schema list.
    Schemata,
}

impl Heading {
    /// Display title.
    pub fn title(self) -> &'static str {
        match self {
            Heading::Sites => "Sites",
            Heading::Schemata => "Schemata",
        }
    }

    fn next(self) -> Self {
        match self {
            Heading::Sites => Heading::Schemata,
            Heading::Schemata => Heading::Sites,
        }
    }
}

/// Something the host has to act on.
#[derive(Debug, Clone)]
pub enum BrowserAction {
    /// Show details for a site.
    OpenSite(Row<SiteConfig>),
    /// Show details for a schema.
    OpenSchema(Row<SchemaConfig>),
    /// Start [`load_hashed_sites`] and feed its result to [`Browser::finish_load`].
    LoadRemoteSites,
    /// Nobody wanted this key.
    Unhandled(KeyEvent),
}

/// Failure of the remote site loading chain.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The user cancelled the fetch or dismissed the prompt.
    #[error("cancelled")]
    Cancelled,
    /// The remote site list could not be fetched.
    #[error("fetching site list failed: {0}")]
    Fetch(#[source] SourceError),
    /// A site could not be unlocked with the given secret.
    #[error("loading site {name} failed: {source}")]
    Derive {
        /// Site being loaded.
        name: String,
        /// Underlying error.
        #[source]
        source: SourceError,
    },
}

/// Sites and schemata lists under two headings, plus overlays.
#[derive(Debug)]
pub struct Browser {
    ctx: UiContext,
    sites: FilterableList<SiteConfig>,
    schemata: FilterableList<SchemaConfig>,
    active: Heading,
    hide_hashed: bool,
}

impl Browser {
    /// Create an empty browser.
    pub fn new(ctx: UiContext, config: &Config) -> Self {
        let sites = FilterableList::new(
            std::iter::empty::<(String, SiteConfig)>(),
            config.keys(),
        )
        .with_page_size(config.page_size);
        let schemata = FilterableList::new(
            std::iter::empty::<(String, SchemaConfig)>(),
            config.keys(),
        )
        .with_page_size(config.page_size);

        Self {
            ctx,
            sites,
            schemata,
            active: Heading::Sites,
            hide_hashed: config.hide_hashed_sites,
        }
    }

    /// Load both universes from `source`, replacing what was there.
    pub fn attach<S: CandidateSource + ?Sized>(&mut self, source: &S) -> Result<(), SourceError> {
        let hide_hashed = self.hide_hashed;
        let sites = source.all_sites()?;
        let schemata = source.all_schemata()?;

        let total_sites = sites.len();
        self.sites.attach(
            sites
                .into_iter()
                .filter(|(label, _)| !(hide_hashed && is_likely_hashed_label(label))),
        );
        self.schemata.attach(schemata);

        tracing::info!(
            sites = self.sites.store().len(),
            hidden = total_sites - self.sites.store().len(),
            schemata = self.schemata.store().len(),
            "attached candidate source"
        );
        Ok(())
    }

    /// Shared UI context.
    pub fn context(&self) -> &UiContext {
        &self.ctx
    }

    /// Active heading.
    pub fn active(&self) -> Heading {
        self.active
    }

    /// Switch headings.
    pub fn set_active(&mut self, heading: Heading) {
        self.active = heading;
    }

    /// Site list.
    pub fn sites(&self) -> &FilterableList<SiteConfig> {
        &self.sites
    }

    /// Schema list.
    pub fn schemata(&self) -> &FilterableList<SchemaConfig> {
        &self.schemata
    }

    /// Labels of every known site.
    pub fn site_labels(&self) -> HashSet<String> {
        self.sites
            .store()
            .rows()
            .map(|row| row.label().to_string())
            .collect()
    }

    /// Merge sites into the site list.
    pub fn add_sites(&mut self, sites: BTreeMap<String, SiteConfig>) {
        self.sites.add_candidates(sites);
    }

    /// Handle a key: overlays first, then the active list, then headings.
    pub fn on_key(&mut self, key: KeyEvent) -> Option<BrowserAction> {
        let key = self.ctx.handle_key(key)?;

        let key = match self.active {
            Heading::Sites => self.sites.on_key(key)?,
            Heading::Schemata => self.schemata.on_key(key)?,
        };
        if key.kind == KeyEventKind::Release {
            return Some(BrowserAction::Unhandled(key));
        }

        match key.code {
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                self.active = self.active.next();
                None
            }
            KeyCode::Enter => match self.active {
                Heading::Sites => self.sites.focused().cloned().map(BrowserAction::OpenSite),
                Heading::Schemata => self
                    .schemata
                    .focused()
                    .cloned()
                    .map(BrowserAction::OpenSchema),
            },
            KeyCode::F(1) if self.active == Heading::Sites => Some(BrowserAction::LoadRemoteSites),
            _ => Some(BrowserAction::Unhandled(key)),
        }
    }

    /// Apply the outcome of [`load_hashed_sites`].
    ///
    /// Cancellation is silent; other failures open a message box. Only
    /// success touches the site list.
    pub fn finish_load(&mut self, result: Result<BTreeMap<String, SiteConfig>, LoadError>) {
        match result {
            Ok(sites) => {
                tracing::info!(count = sites.len(), "remote sites loaded");
                self.add_sites(sites);
            }
            Err(LoadError::Cancelled) => {
                tracing::debug!("remote site load cancelled");
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote site load failed");
                self.ctx.show_message(e.to_string());
            }
        }
    }

    /// Persist the marked site labels.
    pub fn save_marks<B: BlobStore + ?Sized>(
        &self,
        store: &mut B,
        secret: &str,
    ) -> Result<(), BlobError> {
        let labels = self.sites.marked_labels();
        save_labels(store, secret, &labels)?;
        tracing::debug!(count = labels.len(), "saved marked sites");
        Ok(())
    }

    /// Re-mark sites from a saved snapshot. Returns how many were found.
    pub fn restore_marks<B: BlobStore + ?Sized>(
        &mut self,
        store: &B,
        secret: &str,
    ) -> Result<usize, BlobError> {
        let labels = load_labels(store, secret)?;
        Ok(self.sites.restore_marks(&labels))
    }
}

/// Fetch the remote site list, ask for the secret, and unlock every site
/// not in `known`.
///
/// Each step starts only after the previous one resolved. A busy box is
/// shown during the fetch; cancelling it or dismissing the prompt yields
/// [`LoadError::Cancelled`]. Nothing here touches the lists; hand the
/// result to [`Browser::finish_load`].
pub async fn load_hashed_sites<F, S>(
    ctx: &UiContext,
    fetcher: &F,
    source: &S,
    known: &HashSet<String>,
) -> Result<BTreeMap<String, SiteConfig>, LoadError>
where
    F: SiteFetcher + ?Sized,
    S: CandidateSource + ?Sized,
{
    let (fetch, abort) = abortable(fetcher.fetch_site_names());
    let busy = ctx.show_busy("Fetching site list...", abort);
    let fetched = fetch.await;
    ctx.close(busy);

    let names = match fetched {
        Err(Aborted) => return Err(LoadError::Cancelled),
        Ok(result) => result.map_err(LoadError::Fetch)?,
    };
    tracing::debug!(count = names.len(), "fetched remote site names");

    let secret = ctx
        .reveal(HASHED_SITES_PROMPT)
        .await
        .map_err(|_| LoadError::Cancelled)?;

    names
        .into_iter()
        .filter(|name| !known.contains(name))
        .map(|name| match source.site(&name, &secret) {
            Ok(site) => Ok((name, site)),
            Err(err) => Err(LoadError::Derive { name, source: err }),
        })
        .collect()
}

//! Interfaces to the external configuration store, secret prompt and blob storage.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;

use crate::core::{SchemaConfig, SiteConfig};

/// Error from the configuration store or the remote site list.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// No such site or schema.
    #[error("not found: {0}")]
    NotFound(String),
    /// The revealed secret did not unlock the entry.
    #[error("bad secret")]
    BadSecret,
    /// I/O error talking to the store.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Any other store failure.
    #[error("{0}")]
    Other(String),
}

/// Error reading or writing an encrypted blob.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// The secret does not match the one the blob was written with.
    #[error("bad secret")]
    BadSecret,
    /// Decrypted content is not what we wrote.
    #[error("corrupt blob: {0}")]
    Corrupt(String),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// The user dismissed a prompt or cancelled an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cancelled")]
pub struct Cancelled;

/// Read access to the password-management configuration.
pub trait CandidateSource {
    /// All sites with readable names.
    fn all_sites(&self) -> Result<BTreeMap<String, SiteConfig>, SourceError>;

    /// All schemata.
    fn all_schemata(&self) -> Result<BTreeMap<String, SchemaConfig>, SourceError>;

    /// Look up one site, unlocking hashed entries with `secret`.
    fn site(&self, name: &str, secret: &str) -> Result<SiteConfig, SourceError>;
}

/// Remote list of site names (e.g. from an agent process).
pub trait SiteFetcher {
    /// Fetch every known site name.
    fn fetch_site_names(&self) -> LocalBoxFuture<'_, Result<Vec<String>, SourceError>>;
}

/// Asks the user for a secret.
pub trait SecretPrompt {
    /// Start a prompt. The future resolves once the user answers or dismisses it.
    fn reveal(&self, prompt: &str) -> PendingSecret;
}

/// Answering side of a [`PendingSecret`].
///
/// Dropping it without answering counts as a cancellation.
#[derive(Debug)]
pub struct SecretSender(oneshot::Sender<Result<String, Cancelled>>);

impl SecretSender {
    /// Resolve the prompt with the entered secret.
    pub fn reveal(self, secret: String) {
        // receiver gone means nobody is waiting any more
        let _ = self.0.send(Ok(secret));
    }

    /// Resolve the prompt as cancelled.
    pub fn cancel(self) {
        let _ = self.0.send(Err(Cancelled));
    }
}

/// A secret that has been asked for but not yet answered.
#[derive(Debug)]
#[must_use = "futures do nothing unless awaited"]
pub struct PendingSecret(oneshot::Receiver<Result<String, Cancelled>>);

impl PendingSecret {
    /// Create a linked sender/future pair.
    pub fn channel() -> (SecretSender, PendingSecret) {
        let (tx, rx) = oneshot::channel();
        (SecretSender(tx), PendingSecret(rx))
    }

    /// A prompt that was already answered.
    pub fn ready(result: Result<String, Cancelled>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        PendingSecret(rx)
    }
}

impl Future for PendingSecret {
    type Output = Result<String, Cancelled>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.0).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Encrypted blob storage keyed by a secret.
pub trait BlobStore {
    /// Read and decrypt the blob. `Ok(None)` if nothing was written yet.
    fn read(&self, secret: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Encrypt and write the blob, replacing any previous content.
    fn write(&mut self, secret: &str, bytes: &[u8]) -> Result<(), BlobError>;
}

/// In-memory blob store (no encryption, secret is only checked).
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    sealed: Option<(u64, Vec<u8>)>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn secret_fingerprint(secret: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    secret.hash(&mut hasher);
    hasher.finish()
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, secret: &str) -> Result<Option<Vec<u8>>, BlobError> {
        match &self.sealed {
            None => Ok(None),
            Some((fingerprint, _)) if *fingerprint != secret_fingerprint(secret) => {
                Err(BlobError::BadSecret)
            }
            Some((_, bytes)) => Ok(Some(bytes.clone())),
        }
    }

    fn write(&mut self, secret: &str, bytes: &[u8]) -> Result<(), BlobError> {
        self.sealed = Some((secret_fingerprint(secret), bytes.to_vec()));
        Ok(())
    }
}

/// Persist a snapshot of labels as a JSON array.
pub fn save_labels<B: BlobStore + ?Sized>(
    store: &mut B,
    secret: &str,
    labels: &[String],
) -> Result<(), BlobError> {
    let bytes = serde_json::to_vec(labels).map_err(|e| BlobError::Corrupt(e.to_string()))?;
    store.write(secret, &bytes)
}

/// Load a label snapshot. An unwritten store yields an empty list.
pub fn load_labels<B: BlobStore + ?Sized>(
    store: &B,
    secret: &str,
) -> Result<Vec<String>, BlobError> {
    match store.read(secret)? {
        None => Ok(Vec::new()),
        Some(bytes) => {
            serde_json::from_slice(&bytes).map_err(|e| BlobError::Corrupt(e.to_string()))
        }
    }
}

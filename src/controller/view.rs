use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::client::CertificateApi;
use crate::error::Error;
use crate::types::{Certificate, NewCertificate, Result};

/// Certificate view-state controller
///
/// Owns the in-memory collection of certificates shown to a user and
/// sequences client calls into race-safe view-state transitions. All
/// operations take `&self`; concurrent tasks may call them freely. The
/// displayed list always reflects a server-confirmed state: mutations never
/// splice it locally, they trigger a resynchronizing refresh instead.
pub struct CertificateController {
    /// Certificate backend client
    client: Arc<dyn CertificateApi>,
    /// Collection as last returned by the backend, in backend order
    items: RwLock<Vec<Certificate>>,
    /// Whether a list fetch is in flight
    loading: Mutex<bool>,
    /// Ids with a rotation currently in flight. An id sits in this set for
    /// the whole duration of exactly one rotate call, never more than one.
    pending_rotations: Mutex<HashSet<String>>,
    /// Last surfaced error message, cleared on the next successful operation
    last_error: Mutex<Option<String>>,
}

impl CertificateController {
    /// Create a new controller backed by the given client
    pub fn new(client: Arc<dyn CertificateApi>) -> Self {
        Self {
            client,
            items: RwLock::new(Vec::new()),
            loading: Mutex::new(false),
            pending_rotations: Mutex::new(HashSet::new()),
            last_error: Mutex::new(None),
        }
    }

    /// Re-fetch the collection and replace it wholesale
    ///
    /// On failure the view resets to empty rather than keeping a stale list.
    /// Overlapping refreshes are allowed; the last one to complete wins.
    pub async fn refresh(&self) -> Result<()> {
        *self.loading.lock().unwrap() = true;
        debug!("Refreshing certificate list");

        let outcome = match self.client.list().await {
            Ok(certs) => {
                debug!("Fetched {} certificates", certs.len());
                *self.items.write().unwrap() = certs;
                *self.last_error.lock().unwrap() = None;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to refresh certificate list: {}", e);
                self.items.write().unwrap().clear();
                self.record_error(&e);
                Err(e)
            }
        };

        // Loading resets on every exit path, success or failure
        *self.loading.lock().unwrap() = false;
        outcome
    }

    /// Fetch one certificate, for detail views
    pub async fn get(&self, id: &str) -> Result<Certificate> {
        self.client.get(id).await.map_err(|e| {
            warn!("Failed to fetch certificate {}: {}", id, e);
            self.record_error(&e);
            e
        })
    }

    /// Create a certificate and resynchronize the list
    pub async fn create(&self, input: &NewCertificate) -> Result<Certificate> {
        let cert = self.client.create(input).await.map_err(|e| {
            warn!("Failed to create certificate for {}: {}", input.domain_name, e);
            self.record_error(&e);
            e
        })?;

        info!("Created certificate {} for {}", cert.id, cert.domain_name);
        self.refresh().await?;
        Ok(cert)
    }

    /// Delete a certificate and resynchronize the list
    ///
    /// The local list is never spliced; the removal becomes visible only
    /// through the refreshed, server-confirmed collection.
    pub async fn remove(&self, id: &str) -> Result<()> {
        match self.client.remove(id).await {
            Ok(()) => {
                info!("Deleted certificate {}, resynchronizing", id);
                self.refresh().await
            }
            Err(e) => {
                warn!("Failed to delete certificate {}: {}", id, e);
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Rotate a certificate's material, guarded per id
    ///
    /// A rotate call for an id that is already rotating is a no-op: it
    /// returns immediately without contacting the backend. This is what
    /// keeps rapid repeated user action from triggering duplicate
    /// reissuance. The guard is released once the backend call settles,
    /// regardless of outcome, and even when the follow-up resync fails.
    pub async fn rotate(&self, id: &str) -> Result<()> {
        {
            let mut pending = self.pending_rotations.lock().unwrap();
            if !pending.insert(id.to_string()) {
                debug!("Rotation already in flight for {}, ignoring", id);
                return Ok(());
            }
        }

        let outcome = match self.client.rotate(id).await {
            Ok(cert) => {
                info!(
                    "Rotated certificate {}, new fingerprint {}",
                    id,
                    cert.fingerprint_sha256.as_deref().unwrap_or("<none>")
                );
                self.refresh().await
            }
            Err(e) => {
                warn!("Failed to rotate certificate {}: {}", id, e);
                self.record_error(&e);
                Err(e)
            }
        };

        self.pending_rotations.lock().unwrap().remove(id);
        outcome
    }

    /// Snapshot of the displayed collection
    pub fn items(&self) -> Vec<Certificate> {
        self.items.read().unwrap().clone()
    }

    /// Whether a list fetch is currently in flight
    pub fn is_loading(&self) -> bool {
        *self.loading.lock().unwrap()
    }

    /// Whether a rotation is in flight for the given id
    pub fn is_rotating(&self, id: &str) -> bool {
        self.pending_rotations.lock().unwrap().contains(id)
    }

    /// Ids with a rotation currently in flight
    pub fn pending_rotations(&self) -> HashSet<String> {
        self.pending_rotations.lock().unwrap().clone()
    }

    /// Last surfaced error message, if any
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    fn record_error(&self, err: &Error) {
        *self.last_error.lock().unwrap() = Some(err.to_string());
    }
}

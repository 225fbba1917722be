//! SignOutHandler - clears the stored identified profile.

use std::sync::Arc;

use tracing::info;

use crate::ports::{ProfileStore, ProfileStoreError};

/// Handler for signing out.
///
/// Only the durable record is cleared; an in-memory guest is unaffected.
pub struct SignOutHandler {
    store: Arc<dyn ProfileStore>,
}

impl SignOutHandler {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<(), ProfileStoreError> {
        self.store.clear().await?;
        info!("Signed out, stored profile cleared");
        Ok(())
    }
}

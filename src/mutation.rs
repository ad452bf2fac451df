//! Write operations that keep the cache consistent.
//!
//! Mutations go straight to the gateway and, only on success, invalidate the
//! cached queries they affect. There are no optimistic updates: the next
//! fetch shows the server's view.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::QueryKey;
use crate::client::InboxClient;
use crate::error::FetchFailure;
use crate::models::ResourceKind;
use crate::traits::Invalidator;

/// Performs deletes and invalidates the affected cache keys.
#[derive(Clone)]
pub struct MutationCoordinator {
    client: InboxClient,
    invalidator: Arc<dyn Invalidator>,
}

impl MutationCoordinator {
    pub fn new(client: InboxClient, invalidator: Arc<dyn Invalidator>) -> Self {
        Self {
            client,
            invalidator,
        }
    }

    /// Delete one record. On success the kind's list and stats go stale; on
    /// failure nothing is invalidated.
    pub async fn delete_one(&self, kind: ResourceKind, id: &str) -> Result<(), FetchFailure> {
        match self.client.delete_record(kind, id).await {
            Ok(()) => {
                info!(kind = %kind, id, "Deleted record");
                self.invalidator
                    .invalidate_many(&[QueryKey::from(kind), QueryKey::Stats]);
                Ok(())
            }
            Err(err) => {
                warn!(kind = %kind, id, "Delete failed: {}", err);
                Err(err)
            }
        }
    }

    /// Delete every record of every kind, then invalidate all keys.
    pub async fn clear_all(&self) -> Result<(), FetchFailure> {
        match self.client.clear_all().await {
            Ok(()) => {
                info!("Cleared all records");
                self.invalidator.invalidate_many(&QueryKey::ALL);
                Ok(())
            }
            Err(err) => {
                warn!("Clear all failed: {}", err);
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for MutationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationCoordinator")
            .field("client", &self.client)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse, RecordingInvalidator};

    fn coordinator(http: &MockHttpClient, invalidator: &RecordingInvalidator) -> MutationCoordinator {
        let client = InboxClient::new(Arc::new(http.clone()), "http://gw/api/v1");
        MutationCoordinator::new(client, Arc::new(invalidator.clone()))
    }

    #[tokio::test]
    async fn test_delete_invalidates_kind_and_stats() {
        let http = MockHttpClient::new();
        http.on_delete("http://gw/api/v1/emails/e1", MockResponse::empty(204));
        let invalidator = RecordingInvalidator::new();

        coordinator(&http, &invalidator)
            .delete_one(ResourceKind::Email, "e1")
            .await
            .unwrap();

        assert_eq!(invalidator.keys(), vec![QueryKey::Stats, QueryKey::Emails]);
    }

    #[tokio::test]
    async fn test_delete_failure_invalidates_nothing() {
        let http = MockHttpClient::new();
        http.on_delete(
            "http://gw/api/v1/sms/missing",
            MockResponse::Success(crate::traits::Response::new(
                404,
                bytes::Bytes::from(r#"{"error":"sms not found"}"#),
            )),
        );
        let invalidator = RecordingInvalidator::new();

        let err = coordinator(&http, &invalidator)
            .delete_one(ResourceKind::Sms, "missing")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(invalidator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_invalidates_everything() {
        let http = MockHttpClient::new();
        http.on_delete("http://gw/api/v1/messages", MockResponse::empty(200));
        let invalidator = RecordingInvalidator::new();

        let coordinator = coordinator(&http, &invalidator);
        coordinator.clear_all().await.unwrap();
        assert_eq!(invalidator.keys(), QueryKey::ALL.to_vec());

        // Clearing an already empty store behaves the same
        invalidator.clear();
        coordinator.clear_all().await.unwrap();
        assert_eq!(invalidator.keys(), QueryKey::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_clear_all_failure_surfaces_error() {
        let http = MockHttpClient::new();
        http.on_delete("http://gw/api/v1/messages", MockResponse::empty(503));
        let invalidator = RecordingInvalidator::new();

        let err = coordinator(&http, &invalidator).clear_all().await.unwrap_err();
        assert_eq!(err.http_status(), Some(503));
        assert!(invalidator.calls().is_empty());
    }
}

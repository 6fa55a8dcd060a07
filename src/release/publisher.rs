use crate::config::ReleaseConfig;
use crate::domain::ReleaseDraft;
use crate::error::Result;
use crate::host::{ReleaseRecord, ReleaseRequest, SourceHost};
use std::sync::Arc;
use tracing::info;

/// Submits a computed release to the host.
pub struct ReleasePublisher {
    host: Arc<dyn SourceHost>,
    options: ReleaseConfig,
}

impl ReleasePublisher {
    pub fn new(host: Arc<dyn SourceHost>, options: &ReleaseConfig) -> Self {
        ReleasePublisher {
            host,
            options: options.clone(),
        }
    }

    /// Build the request for a draft without sending it
    pub fn request_for(&self, draft: &ReleaseDraft) -> ReleaseRequest {
        ReleaseRequest {
            tag_name: draft.version.clone(),
            target_commitish: draft.target_ref.clone(),
            name: self.options.name_pattern.replace("{tag}", &draft.version),
            body: draft.body.clone(),
            prerelease: self.options.prerelease,
            make_latest: self.options.make_latest,
        }
    }

    pub async fn publish(&self, draft: &ReleaseDraft) -> Result<ReleaseRecord> {
        let request = self.request_for(draft);
        let record = self.host.create_release(&request).await?;
        info!(id = record.id, url = %record.html_url, tag = %request.tag_name, "release created");
        Ok(record)
    }
}

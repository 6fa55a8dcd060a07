use crate::boundary::BoundaryWarning;
use crate::config::{Config, HistoryConfig, TagOrdering};
use crate::domain::{Tag, TagPattern};
use crate::error::Result;
use crate::host::SourceHost;
use crate::release::batch::fan_out;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of tag location: the latest release tag, if any, and the tags
/// passed over because they are not release points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagLocation {
    pub tag: Option<Tag>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Finds the most recent release tag of the repository.
///
/// Only tags following the tag pattern with a full semantic version count
/// as release points; floating tags such as `v1` or `nightly` are skipped.
pub struct TagLocator {
    host: Arc<dyn SourceHost>,
    history: HistoryConfig,
    ordering: TagOrdering,
    pattern: TagPattern,
}

impl TagLocator {
    pub fn new(host: Arc<dyn SourceHost>, config: &Config) -> Self {
        TagLocator {
            host,
            history: config.history.clone(),
            ordering: config.tags.ordering,
            pattern: config.tag_pattern(),
        }
    }

    /// The latest release tag, or `None` when the repository has none yet.
    ///
    /// A failing listing or commit lookup fails the run.
    pub async fn locate(&self) -> Result<TagLocation> {
        let mut warnings = Vec::new();
        let tag = match self.ordering {
            TagOrdering::Listing => self.first_release_tag(&mut warnings).await?,
            TagOrdering::Created => {
                let tags = self.list_all_tags().await?;
                let candidates = self.release_tags(tags, &mut warnings);
                self.newest_by_commit_date(candidates).await?
            }
        };

        match &tag {
            Some(tag) => info!(tag = %tag.name, sha = %tag.commit_sha, "latest tag located"),
            None => info!("repository has no release tags"),
        }
        Ok(TagLocation { tag, warnings })
    }

    /// First release tag in host order, scanning pages until one is found
    async fn first_release_tag(&self, warnings: &mut Vec<BoundaryWarning>) -> Result<Option<Tag>> {
        let per_page = self.history.page_size();

        for page in 1..=self.history.page_limit() {
            let batch = self.host.list_tags(page, per_page).await?;
            let last_page = (batch.len() as u32) < per_page;
            info!(page, tags = %describe_tags(&batch), "existing tags");

            for tag in batch {
                if self.pattern.matches(&tag.name) {
                    return Ok(Some(tag));
                }
                warnings.push(self.mismatch(&tag));
            }
            if last_page {
                break;
            }
        }
        Ok(None)
    }

    async fn list_all_tags(&self) -> Result<Vec<Tag>> {
        let per_page = self.history.page_size();
        let mut tags = Vec::new();

        for page in 1..=self.history.page_limit() {
            let batch = self.host.list_tags(page, per_page).await?;
            let last_page = (batch.len() as u32) < per_page;
            tags.extend(batch);
            if last_page {
                break;
            }
        }

        info!(count = tags.len(), tags = %describe_tags(&tags), "existing tags");
        Ok(tags)
    }

    fn release_tags(&self, tags: Vec<Tag>, warnings: &mut Vec<BoundaryWarning>) -> Vec<Tag> {
        let (release, skipped): (Vec<Tag>, Vec<Tag>) = tags
            .into_iter()
            .partition(|tag| self.pattern.matches(&tag.name));
        warnings.extend(skipped.iter().map(|tag| self.mismatch(tag)));
        debug!(release = release.len(), skipped = skipped.len(), "tags filtered");
        release
    }

    fn mismatch(&self, tag: &Tag) -> BoundaryWarning {
        BoundaryWarning::TagMismatchPattern {
            tag: tag.name.clone(),
            pattern: self.pattern.pattern.clone(),
        }
    }

    /// Pick the tag whose commit is newest; ties and undated commits keep
    /// listing order.
    async fn newest_by_commit_date(&self, tags: Vec<Tag>) -> Result<Option<Tag>> {
        let mut shas: Vec<String> = Vec::new();
        for tag in &tags {
            if !shas.contains(&tag.commit_sha) {
                shas.push(tag.commit_sha.clone());
            }
        }

        let host = Arc::clone(&self.host);
        let lookups = fan_out(shas.clone(), self.history.concurrency(), move |sha| {
            let host = Arc::clone(&host);
            async move { host.get_commit(&sha).await }
        })
        .await?;

        let mut dates: HashMap<String, Option<DateTime<Utc>>> = HashMap::new();
        for (sha, lookup) in shas.into_iter().zip(lookups) {
            dates.insert(sha, lookup?.committed_at);
        }

        let mut best: Option<(&Tag, Option<DateTime<Utc>>)> = None;
        for tag in &tags {
            let date = dates.get(&tag.commit_sha).copied().flatten();
            if best.map_or(true, |(_, best_date)| date > best_date) {
                best = Some((tag, date));
            }
        }

        Ok(best.map(|(tag, _)| tag.clone()))
    }
}

/// Comma separated tag names for logging
fn describe_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

use crate::domain::{Commit, PullRequest, Tag};
use crate::error::{ReleaseError, Result};
use crate::host::{ReleaseRecord, ReleaseRequest, SourceHost};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("gh-autorelease/", env!("CARGO_PKG_VERSION"));

/// Repository identifier in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn parse(slug: &str) -> Result<Self> {
        match slug.trim().split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(RepoSlug {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(ReleaseError::config(format!(
                "repository must be in 'owner/name' form, got '{}'",
                slug
            ))),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Deserialize)]
struct TagResponse {
    name: String,
    commit: ShaRef,
}

#[derive(Debug, Deserialize)]
struct ShaRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    committer: Option<Signature>,
}

#[derive(Debug, Deserialize)]
struct Signature {
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    number: u64,
    title: String,
    user: Option<UserRef>,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl From<TagResponse> for Tag {
    fn from(tag: TagResponse) -> Self {
        Tag::new(tag.name, tag.commit.sha)
    }
}

impl From<CommitResponse> for Commit {
    fn from(response: CommitResponse) -> Self {
        Commit {
            sha: response.sha,
            message: response.commit.message,
            committed_at: response.commit.committer.and_then(|c| c.date),
        }
    }
}

impl From<PullResponse> for PullRequest {
    fn from(pull: PullResponse) -> Self {
        // Deleted accounts come back without a user
        let author = pull
            .user
            .map(|user| user.login)
            .unwrap_or_else(|| "ghost".to_string());
        PullRequest::new(pull.number, pull.title, author)
    }
}

/// GitHub REST API client scoped to one repository
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: Url,
    repo: RepoSlug,
}

impl GitHubClient {
    /// Create a client for `repo`. Requests are anonymous when `token` is
    /// `None`, which only works for public repositories and never for
    /// release creation.
    pub fn new(api_url: &str, repo: RepoSlug, token: Option<&str>) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| ReleaseError::config(format!("invalid api url '{}': {}", api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(ReleaseError::config(format!(
                "api url '{}' cannot be used as a base",
                api_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ReleaseError::config("token contains invalid characters"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(GitHubClient {
            http,
            api_url,
            repo,
        })
    }

    pub fn repo(&self) -> &RepoSlug {
        &self.repo
    }

    /// Build `<api>/repos/<owner>/<name>/<segments...>`; each segment may
    /// itself contain `/` (e.g. a branch named `release/1.x`).
    fn repo_url(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push("repos")
                .push(&self.repo.owner)
                .push(&self.repo.name);
            for segment in segments {
                path.extend(segment.split('/').filter(|s| !s.is_empty()));
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        debug!(%url, "GET");
        let response = self.http.get(url).query(query).send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        let bytes = response.bytes().await?;
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let text = response.text().await.unwrap_or_default();
    Err(ReleaseError::api(status.as_u16(), api_error_message(&text)))
}

/// Pull the `message` field out of a GitHub error body, falling back to the
/// raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn release_payload(request: &ReleaseRequest) -> serde_json::Value {
    serde_json::json!({
        "tag_name": request.tag_name,
        "target_commitish": request.target_commitish,
        "name": request.name,
        "body": request.body,
        "prerelease": request.prerelease,
        "make_latest": if request.make_latest { "true" } else { "false" },
    })
}

fn page_query(page: u32, per_page: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("per_page", per_page.to_string())]
}

#[async_trait]
impl SourceHost for GitHubClient {
    async fn list_tags(&self, page: u32, per_page: u32) -> Result<Vec<Tag>> {
        let url = self.repo_url(&["tags"]);
        let tags: Vec<TagResponse> = self.get_json(url, &page_query(page, per_page)).await?;
        Ok(tags.into_iter().map(Tag::from).collect())
    }

    async fn get_commit(&self, reference: &str) -> Result<Commit> {
        let url = self.repo_url(&["commits", reference]);
        let commit: CommitResponse = self.get_json(url, &[]).await?;
        Ok(commit.into())
    }

    async fn list_commits(&self, head: &str, page: u32, per_page: u32) -> Result<Vec<Commit>> {
        let url = self.repo_url(&["commits"]);
        let mut query = page_query(page, per_page);
        query.push(("sha", head.to_string()));
        let commits: Vec<CommitResponse> = self.get_json(url, &query).await?;
        Ok(commits.into_iter().map(Commit::from).collect())
    }

    async fn list_pull_requests_for_commit(&self, sha: &str) -> Result<Vec<PullRequest>> {
        let url = self.repo_url(&["commits", sha, "pulls"]);
        let pulls: Vec<PullResponse> = self.get_json(url, &[]).await?;
        Ok(pulls.into_iter().map(PullRequest::from).collect())
    }

    async fn create_release(&self, request: &ReleaseRequest) -> Result<ReleaseRecord> {
        let url = self.repo_url(&["releases"]);
        debug!(%url, tag = %request.tag_name, "POST");
        let response = self
            .http
            .post(url)
            .json(&release_payload(request))
            .send()
            .await?;
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> GitHubClient {
        GitHubClient::new(api_url, RepoSlug::parse("octo/widgets").unwrap(), None).unwrap()
    }

    #[test]
    fn test_repo_slug_parse() {
        let slug = RepoSlug::parse("octo/widgets").unwrap();
        assert_eq!(slug.owner, "octo");
        assert_eq!(slug.name, "widgets");
        assert_eq!(slug.to_string(), "octo/widgets");
    }

    #[test]
    fn test_repo_slug_rejects_malformed() {
        for bad in ["", "octo", "octo/", "/widgets", "a/b/c"] {
            assert!(RepoSlug::parse(bad).is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_repo_url() {
        let client = client(DEFAULT_API_URL);
        assert_eq!(
            client.repo_url(&["commits", "abc123", "pulls"]).as_str(),
            "https://api.github.com/repos/octo/widgets/commits/abc123/pulls"
        );
    }

    #[test]
    fn test_repo_url_enterprise_base_and_slashed_ref() {
        let client = client("https://ghe.example.com/api/v3/");
        assert_eq!(
            client.repo_url(&["commits", "release/1.x"]).as_str(),
            "https://ghe.example.com/api/v3/repos/octo/widgets/commits/release/1.x"
        );
    }

    #[test]
    fn test_invalid_api_url() {
        let err = GitHubClient::new("not a url", RepoSlug::parse("a/b").unwrap(), None)
            .err()
            .unwrap();
        assert!(matches!(err, ReleaseError::Config(_)));
    }

    #[test]
    fn test_commit_response_conversion() {
        let json = r#"{
            "sha": "c8",
            "commit": {
                "message": "feat: x",
                "committer": { "name": "a", "date": "2024-05-01T12:00:00Z" }
            }
        }"#;
        let commit: Commit = serde_json::from_str::<CommitResponse>(json).unwrap().into();
        assert_eq!(commit.sha, "c8");
        assert_eq!(commit.message, "feat: x");
        assert!(commit.committed_at.is_some());
    }

    #[test]
    fn test_pull_response_without_user() {
        let json = r#"{ "number": 7, "title": "t", "user": null }"#;
        let pr: PullRequest = serde_json::from_str::<PullResponse>(json).unwrap().into();
        assert_eq!(pr, PullRequest::new(7, "t", "ghost"));
    }

    #[test]
    fn test_tag_response_conversion() {
        let json = r#"[{ "name": "v1.4.0", "commit": { "sha": "c5", "url": "x" }, "zipball_url": "z" }]"#;
        let tags: Vec<TagResponse> = serde_json::from_str(json).unwrap();
        let tag: Tag = tags.into_iter().next().unwrap().into();
        assert_eq!(tag, Tag::new("v1.4.0", "c5"));
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"message":"Bad credentials","documentation_url":"x"}"#),
            "Bad credentials"
        );
        assert_eq!(api_error_message("  gateway timeout \n"), "gateway timeout");
    }

    #[test]
    fn test_release_payload_make_latest_is_string() {
        let request = ReleaseRequest {
            tag_name: "v1.5.0".to_string(),
            target_commitish: "c8".to_string(),
            name: "v1.5.0".to_string(),
            body: "notes".to_string(),
            prerelease: false,
            make_latest: true,
        };
        let payload = release_payload(&request);
        assert_eq!(payload["make_latest"], "true");
        assert_eq!(payload["prerelease"], false);
        assert_eq!(payload["target_commitish"], "c8");
    }
}

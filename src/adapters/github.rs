use crate::core::pages;
use crate::domain::model::{Credential, PagesStatus, RemoteRepository, DEPLOY_BRANCH};
use crate::domain::ports::HostingApi;
use crate::utils::error::{DeployError, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const ACCEPT: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    clone_url: String,
}

#[derive(Debug, Serialize)]
struct CreateRepositoryRequest<'a> {
    name: &'a str,
    description: &'a str,
    homepage: String,
    private: bool,
    auto_init: bool,
}

#[derive(Debug, Serialize)]
struct PagesRequest<'a> {
    source: PagesSource<'a>,
}

#[derive(Debug, Serialize)]
struct PagesSource<'a> {
    branch: &'a str,
    path: &'a str,
}

/// GitHub REST client. Every request carries the bearer token, the
/// `vnd.github+json` media type and a pinned API version.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    credential: Credential,
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("pages-deploy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .bearer_auth(self.credential.expose())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn find_repository(&self, account: &str, repo: &str) -> Result<Option<String>> {
        let response = self
            .request(Method::GET, &format!("/repos/{}/{}", account, repo))
            .send()
            .await?;

        tracing::debug!("Repository lookup status: {}", response.status());

        if !response.status().is_success() {
            return Ok(None);
        }

        let body: RepositoryResponse = response.json().await?;
        Ok(Some(body.clone_url))
    }

    async fn create_repository(
        &self,
        account: &str,
        repo: &str,
        description: &str,
        private: bool,
    ) -> Result<String> {
        let payload = CreateRepositoryRequest {
            name: repo,
            description,
            homepage: pages::homepage(account),
            private,
            auto_init: false,
        };

        let response = self
            .request(Method::POST, "/user/repos")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(DeployError::RepoCreationError {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: RepositoryResponse = serde_json::from_str(&text)?;
        Ok(body.clone_url)
    }

    async fn post_pages(&self, account: &str, repo: &str) -> Result<PagesStatus> {
        let payload = PagesRequest {
            source: PagesSource {
                branch: DEPLOY_BRANCH,
                path: "/",
            },
        };

        let response = self
            .request(Method::POST, &format!("/repos/{}/{}/pages", account, repo))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let outcome = match status {
            StatusCode::CREATED => PagesStatus::Enabled,
            // GitHub answers 409 (older deployments 422) when Pages is already on
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => PagesStatus::AlreadyEnabled,
            _ => PagesStatus::Failed {
                status: Some(status.as_u16()),
                body: response.text().await.unwrap_or_default(),
            },
        };
        Ok(outcome)
    }
}

#[async_trait::async_trait]
impl HostingApi for GitHubClient {
    async fn ensure_repository(
        &self,
        account: &str,
        repo: &str,
        description: &str,
        private: bool,
    ) -> Result<RemoteRepository> {
        if let Some(clone_url) = self.find_repository(account, repo).await? {
            println!("  ✓ Repo '{}' already exists on GitHub.", repo);
            return Ok(RemoteRepository {
                clone_url,
                created: false,
            });
        }

        println!("  Creating repo '{}' on GitHub...", repo);
        let clone_url = self
            .create_repository(account, repo, description, private)
            .await?;
        println!("  ✓ Repo created.");
        tracing::info!("Created repository {}/{} (private: {})", account, repo, private);

        Ok(RemoteRepository {
            clone_url,
            created: true,
        })
    }

    async fn enable_pages(&self, account: &str, repo: &str) -> PagesStatus {
        match self.post_pages(account, repo).await {
            Ok(status) => status,
            Err(e) => PagesStatus::Failed {
                status: None,
                body: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> GitHubClient {
        GitHubClient::new(server.base_url(), Credential::new("test-token")).unwrap()
    }

    #[tokio::test]
    async fn test_existing_repository_returns_clone_url() {
        let server = MockServer::start();

        let lookup = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/alice/portfolio")
                .header("authorization", "Bearer test-token")
                .header("accept", "application/vnd.github+json")
                .header("x-github-api-version", "2022-11-28");
            then.status(200).json_body(serde_json::json!({
                "name": "portfolio",
                "clone_url": "https://github.com/alice/portfolio.git"
            }));
        });
        let create = server.mock(|when, then| {
            when.method(POST).path("/user/repos");
            then.status(201);
        });

        let repo = client(&server)
            .ensure_repository("alice", "portfolio", "desc", false)
            .await
            .unwrap();

        lookup.assert();
        create.assert_hits(0);
        assert_eq!(repo.clone_url, "https://github.com/alice/portfolio.git");
        assert!(!repo.created);
    }

    #[tokio::test]
    async fn test_missing_repository_is_created() {
        let server = MockServer::start();

        let lookup = server.mock(|when, then| {
            when.method(GET).path("/repos/alice/portfolio");
            then.status(404).json_body(serde_json::json!({"message": "Not Found"}));
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/user/repos")
                .header("authorization", "Bearer test-token")
                .json_body(serde_json::json!({
                    "name": "portfolio",
                    "description": "My site",
                    "homepage": "https://alice.github.io",
                    "private": true,
                    "auto_init": false
                }));
            then.status(201).json_body(serde_json::json!({
                "clone_url": "https://github.com/alice/portfolio.git"
            }));
        });

        let repo = client(&server)
            .ensure_repository("alice", "portfolio", "My site", true)
            .await
            .unwrap();

        lookup.assert();
        create.assert();
        assert!(repo.created);
        assert_eq!(repo.clone_url, "https://github.com/alice/portfolio.git");
    }

    #[tokio::test]
    async fn test_creation_failure_reports_status_and_body() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/repos/alice/portfolio");
            then.status(404);
        });
        server.mock(|when, then| {
            when.method(POST).path("/user/repos");
            then.status(403).body("{\"message\":\"Resource not accessible\"}");
        });

        let err = client(&server)
            .ensure_repository("alice", "portfolio", "desc", false)
            .await
            .unwrap_err();

        match err {
            DeployError::RepoCreationError { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("Resource not accessible"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ensure_twice_never_creates() {
        let server = MockServer::start();

        let lookup = server.mock(|when, then| {
            when.method(GET).path("/repos/alice/portfolio");
            then.status(200).json_body(serde_json::json!({
                "clone_url": "https://github.com/alice/portfolio.git"
            }));
        });
        let create = server.mock(|when, then| {
            when.method(POST).path("/user/repos");
            then.status(201);
        });

        let github = client(&server);
        let first = github
            .ensure_repository("alice", "portfolio", "desc", false)
            .await
            .unwrap();
        let second = github
            .ensure_repository("alice", "portfolio", "desc", false)
            .await
            .unwrap();

        lookup.assert_hits(2);
        create.assert_hits(0);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_enable_pages_statuses() {
        let cases = [
            (201, PagesStatus::Enabled),
            (409, PagesStatus::AlreadyEnabled),
            (422, PagesStatus::AlreadyEnabled),
        ];

        for (code, expected) in cases {
            let server = MockServer::start();
            let pages = server.mock(|when, then| {
                when.method(POST)
                    .path("/repos/alice/portfolio/pages")
                    .json_body(serde_json::json!({
                        "source": {"branch": "main", "path": "/"}
                    }));
                then.status(code);
            });

            let status = client(&server).enable_pages("alice", "portfolio").await;

            pages.assert();
            assert_eq!(status, expected, "status code {}", code);
        }
    }

    #[tokio::test]
    async fn test_enable_pages_failure_is_reported_not_raised() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/repos/alice/portfolio/pages");
            then.status(403).body("forbidden");
        });

        let status = client(&server).enable_pages("alice", "portfolio").await;

        assert_eq!(
            status,
            PagesStatus::Failed {
                status: Some(403),
                body: "forbidden".to_string()
            }
        );
        assert!(!status.is_success());
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub pull request lookups

use super::{ForgeAdapter, ForgeError, PullRequestState};
use async_trait::async_trait;
use serde::Deserialize;

/// GitHub REST adapter for one repository
#[derive(Clone, Debug)]
pub struct GitHubForge {
    api_url: String,
    owner: String,
    name: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullSummary {
    state: String,
    #[serde(default)]
    merged_at: Option<String>,
}

impl GitHubForge {
    /// `repository` is `owner/name`; `token` is sent as a bearer token
    pub fn new(
        api_url: impl Into<String>,
        repository: &str,
        token: Option<String>,
    ) -> Result<Self, ForgeError> {
        let (owner, name) = repository
            .split_once('/')
            .filter(|(o, n)| !o.is_empty() && !n.is_empty() && !n.contains('/'))
            .ok_or_else(|| ForgeError::InvalidRepository(repository.to_string()))?;
        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            name: name.to_string(),
            token,
        })
    }

    fn pulls_url(&self) -> String {
        format!("{}/repos/{}/{}/pulls", self.api_url, self.owner, self.name)
    }

    /// Newest pull request of any state whose head is `owner:branch`
    fn pulls_query(&self, branch: &str) -> Vec<(&'static str, String)> {
        vec![
            ("state", "all".to_string()),
            ("per_page", "1".to_string()),
            ("head", format!("{}:{}", self.owner, branch)),
        ]
    }

    fn fetch(
        url: &str,
        query: Vec<(&'static str, String)>,
        token: Option<&str>,
    ) -> Result<String, ForgeError> {
        let mut request = ureq::get(url)
            .query_pairs(query)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "gw");
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        let mut response = request
            .call()
            .map_err(|e| ForgeError::Request(format!("GET {}: {}", url, e)))?;
        response
            .body_mut()
            .read_to_string()
            .map_err(|e| ForgeError::Response(format!("failed to read response: {}", e)))
    }
}

/// Interpret the pull list returned for a head branch
fn parse_pull_state(body: &str) -> Result<Option<PullRequestState>, ForgeError> {
    let pulls: Vec<PullSummary> =
        serde_json::from_str(body).map_err(|e| ForgeError::Response(e.to_string()))?;
    let Some(pull) = pulls.into_iter().next() else {
        return Ok(None);
    };
    match (pull.state.as_str(), pull.merged_at) {
        ("open", _) => Ok(Some(PullRequestState::Open)),
        ("closed", Some(_)) => Ok(Some(PullRequestState::Merged)),
        ("closed", None) => Ok(Some(PullRequestState::Closed)),
        (other, _) => Err(ForgeError::Response(format!(
            "unknown pull request state '{}'",
            other
        ))),
    }
}

#[async_trait]
impl ForgeAdapter for GitHubForge {
    async fn pull_request_state(
        &self,
        branch: &str,
    ) -> Result<Option<PullRequestState>, ForgeError> {
        let url = self.pulls_url();
        let query = self.pulls_query(branch);
        let token = self.token.clone();
        // ureq is blocking
        let body = tokio::task::spawn_blocking(move || Self::fetch(&url, query, token.as_deref()))
            .await
            .map_err(|e| ForgeError::Request(e.to_string()))??;
        parse_pull_state(&body)
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;

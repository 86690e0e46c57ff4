use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{Credentials, EMAIL_VAR, TOKEN_VAR};
use crate::domain::document::Document;
use crate::domain::ticket::{
    Account, ISSUE_FIELDS, NewTicket, Project, Ticket, Transition, validate_ticket_key,
};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    base_url: String,
    auth_header: String,
    credentials_hint: String,
}

impl JiraClient {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            http: Client::new(),
            base_url: credentials.url.trim_end_matches('/').to_string(),
            auth_header: Self::auth_header(&credentials.email, &credentials.token),
            credentials_hint: format!("{EMAIL_VAR} and {TOKEN_VAR}"),
        }
    }

    /// Names where the credentials came from in authentication errors.
    pub fn with_credentials_hint(mut self, hint: impl Into<String>) -> Self {
        self.credentials_hint = hint.into();
        self
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/rest/api/3/{}", self.base_url, path)
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }

    fn issue_path(key: &str, suffix: &str) -> AppResult<String> {
        let key = validate_ticket_key(key)?;
        Ok(format!("issue/{key}{suffix}"))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.api_url(path);
        debug!(method = method.as_str(), url = url.as_str(), "jira request");
        self.http
            .request(method, url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;
        debug!(status = %response.status(), "jira response");
        Ok(response)
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> AppResult<Response> {
        let request = self
            .request(Method::POST, path)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        let response = self.send(request).await?;
        self.ensure_success(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        let response = self.ensure_success(response).await?;
        parse_json(response).await
    }

    async fn ensure_success(&self, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Authentication(format!(
                "Jira rejected the credentials; check {} ({status})",
                self.credentials_hint
            )));
        }
        Err(AppError::IssueTracker(format!(
            "Jira responded with {status}: {body}"
        )))
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    response
        .json()
        .await
        .map_err(|err| AppError::IssueTracker(format!("failed to parse Jira response: {err}")))
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn get_issue(&self, key: &str) -> AppResult<Value> {
        let request = self
            .request(Method::GET, &Self::issue_path(key, "")?)
            .query(&[("fields", ISSUE_FIELDS)]);
        let response = self.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("ticket {key}")));
        }
        let response = self.ensure_success(response).await?;
        parse_json(response).await
    }

    async fn get_transitions(&self, key: &str) -> Vec<Transition> {
        let path = match Self::issue_path(key, "/transitions") {
            Ok(path) => path,
            Err(err) => {
                debug!(%key, error = %err, "skipping transition lookup");
                return Vec::new();
            }
        };
        match self.get_json::<TransitionsResponse>(&path).await {
            Ok(payload) => payload.transitions,
            Err(err) => {
                debug!(%key, error = %err, "transition lookup failed, treating as none available");
                Vec::new()
            }
        }
    }

    async fn transition_issue(&self, key: &str, transition_name: &str) -> AppResult<bool> {
        let path = Self::issue_path(key, "/transitions")?;
        let transitions = self.get_transitions(key).await;
        let Some(transition) = transitions
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(transition_name))
        else {
            warn!(%key, transition = transition_name, "transition not available");
            return Ok(false);
        };

        let body = TransitionRequest {
            transition: TransitionId {
                id: &transition.id,
            },
        };
        self.post_json(&path, &body).await?;
        Ok(true)
    }

    async fn add_comment(&self, key: &str, text: &str) -> AppResult<()> {
        let body = CommentRequest {
            body: Document::paragraph(text),
        };
        self.post_json(&Self::issue_path(key, "/comment")?, &body)
            .await?;
        Ok(())
    }

    async fn create_issue(&self, ticket: &NewTicket) -> AppResult<Ticket> {
        let project_key = ticket.project.trim();
        if project_key.is_empty() {
            return Err(AppError::IssueTracker(
                "project key must not be empty".to_string(),
            ));
        }
        if ticket.summary.trim().is_empty() {
            return Err(AppError::IssueTracker(
                "ticket summary must not be empty".to_string(),
            ));
        }

        let request_body = CreateIssueRequest::new(
            project_key,
            ticket.issue_type.trim(),
            ticket.summary.trim(),
            &ticket.description,
        );
        let response = self.post_json("issue", &request_body).await?;
        let payload: CreateIssueResponse = parse_json(response).await?;

        let url = self.browse_url(&payload.key);
        Ok(Ticket {
            key: payload.key,
            id: payload.id,
            url,
        })
    }

    async fn myself(&self) -> AppResult<Account> {
        self.get_json("myself").await
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        self.get_json("project").await
    }

    async fn search_recent(&self, limit: usize) -> AppResult<Vec<Value>> {
        let limit = limit.to_string();
        let request = self.request(Method::GET, "search/jql").query(&[
            ("jql", "order by created DESC"),
            ("maxResults", limit.as_str()),
            ("fields", "summary,status,issuetype"),
        ]);
        let response = self.send(request).await?;
        let response = self.ensure_success(response).await?;
        let payload: SearchResponse = parse_json(response).await?;
        Ok(payload.issues)
    }
}

#[derive(Deserialize)]
struct TransitionsResponse {
    #[serde(default)]
    transitions: Vec<Transition>,
}

#[derive(Serialize)]
struct TransitionRequest<'a> {
    transition: TransitionId<'a>,
}

#[derive(Serialize)]
struct TransitionId<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct CommentRequest {
    body: Document,
}

#[derive(Serialize)]
struct CreateIssueRequest {
    fields: CreateIssueFields,
}

impl CreateIssueRequest {
    fn new(project_key: &str, issue_type: &str, summary: &str, description: &str) -> Self {
        Self {
            fields: CreateIssueFields {
                project: KeyRef {
                    key: project_key.to_string(),
                },
                summary: summary.to_string(),
                description: Document::from_plain_text(description),
                issuetype: NameRef {
                    name: issue_type.to_string(),
                },
            },
        }
    }
}

#[derive(Serialize)]
struct CreateIssueFields {
    project: KeyRef,
    summary: String,
    description: Document,
    issuetype: NameRef,
}

#[derive(Serialize)]
struct KeyRef {
    key: String,
}

#[derive(Serialize)]
struct NameRef {
    name: String,
}

#[derive(Deserialize)]
struct CreateIssueResponse {
    id: String,
    key: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<Value>,
}

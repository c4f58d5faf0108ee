//! HTTP client for the remote authority (authenticated sessions).
//!
//! Maps the backend operation set onto the authority's CRUD surface.
//! Endpoints are scoped to the bearer principal; the authority reports
//! ownership mismatches as not-found, never as a permission error.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DayplanError, Result};
use crate::model::{Template, Todo, TodoPatch};

use super::Backend;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the remote authority's template/todo API.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    http: Client,
    base_url: Url,
    token: String,
}

impl RemoteBackend {
    /// Create a client against `base_url` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns `DayplanError::Validation` for an unparseable URL and
    /// `DayplanError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DayplanError::Validation(format!("Invalid remote URL: {}", e)))?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("dayplan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DayplanError::Transport(e.to_string()))?;
        debug!(url = %base_url, "remote authority client ready");
        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| DayplanError::Validation(format!("Invalid endpoint {}: {}", path, e)))
    }

    async fn decode<T: for<'de> Deserialize<'de>>(res: Response) -> Result<T> {
        if res.status().is_success() {
            res.json::<T>()
                .await
                .map_err(|e| DayplanError::Transport(format!("Invalid response body: {}", e)))
        } else {
            Err(Self::error_for(res).await)
        }
    }

    async fn expect_success(res: Response) -> Result<()> {
        if res.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_for(res).await)
        }
    }

    async fn error_for(res: Response) -> DayplanError {
        let status = res.status();
        let message = res
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        match status {
            StatusCode::UNAUTHORIZED => DayplanError::Unauthorized(message),
            StatusCode::NOT_FOUND => DayplanError::NotFound(message),
            StatusCode::BAD_REQUEST => DayplanError::Validation(message),
            _ => DayplanError::Transport(format!("HTTP {}: {}", status.as_u16(), message)),
        }
    }
}

/// Error payload shape used by the authority.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct CreateTemplateBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTemplateBody<'a> {
    id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTodoBody<'a> {
    content: &'a str,
    template_id: Uuid,
    date: NaiveDate,
}

#[derive(Serialize)]
struct UpdateTodoBody<'a> {
    id: Uuid,
    #[serde(flatten)]
    patch: &'a TodoPatch,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderBody<'a> {
    template_id: Uuid,
    todos: &'a [Uuid],
}

#[async_trait]
impl Backend for RemoteBackend {
    async fn load_templates(&self) -> Result<Vec<Template>> {
        let res = self
            .http
            .get(self.endpoint("api/templates")?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode(res).await
    }

    async fn create_template(&self, name: &str) -> Result<Template> {
        let res = self
            .http
            .post(self.endpoint("api/templates")?)
            .bearer_auth(&self.token)
            .json(&CreateTemplateBody { name })
            .send()
            .await?;
        Self::decode(res).await
    }

    async fn rename_template(&self, id: Uuid, name: &str) -> Result<Template> {
        let res = self
            .http
            .patch(self.endpoint("api/templates")?)
            .bearer_auth(&self.token)
            .json(&UpdateTemplateBody {
                id,
                name: Some(name),
                is_active: None,
            })
            .send()
            .await?;
        Self::decode(res).await
    }

    async fn activate_template(&self, id: Uuid) -> Result<()> {
        let res = self
            .http
            .patch(self.endpoint("api/templates")?)
            .bearer_auth(&self.token)
            .json(&UpdateTemplateBody {
                id,
                name: None,
                is_active: Some(true),
            })
            .send()
            .await?;
        // The authority echoes the template; parsing validates the reply.
        let _: Template = Self::decode(res).await?;
        Ok(())
    }

    async fn delete_template(&self, id: Uuid) -> Result<()> {
        let res = self
            .http
            .delete(self.endpoint(&format!("api/templates/{}", id))?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::expect_success(res).await
    }

    async fn create_todo(&self, template_id: Uuid, content: &str, date: NaiveDate) -> Result<Todo> {
        let res = self
            .http
            .post(self.endpoint("api/todos")?)
            .bearer_auth(&self.token)
            .json(&CreateTodoBody {
                content,
                template_id,
                date,
            })
            .send()
            .await?;
        Self::decode(res).await
    }

    async fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo> {
        let res = self
            .http
            .patch(self.endpoint("api/todos")?)
            .bearer_auth(&self.token)
            .json(&UpdateTodoBody { id, patch })
            .send()
            .await?;
        Self::decode(res).await
    }

    async fn delete_todo(&self, id: Uuid) -> Result<()> {
        let res = self
            .http
            .delete(self.endpoint(&format!("api/todos/{}", id))?)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::expect_success(res).await
    }

    async fn reorder_todos(&self, template_id: Uuid, ids: &[Uuid]) -> Result<()> {
        let res = self
            .http
            .post(self.endpoint("api/todos/reorder")?)
            .bearer_auth(&self.token)
            .json(&ReorderBody {
                template_id,
                todos: ids,
            })
            .send()
            .await?;
        Self::expect_success(res).await
    }
}

use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;
use crate::models::{
    Investment, InvestmentUpdate, NewInvestment, NewProject, Project, ProjectUpdate,
};

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the API client. Server-reported errors carry the
/// backend's own message field; everything else degrades to the transport
/// error description.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success response with a human-readable message
    #[error("{message}")]
    Server { status: u16, message: String },

    /// HTTP client error
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Error body shape returned by the backend service
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// HTTP client for the crowdfunding REST service
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client against the configured base URL
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Project operations
    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        let response = self.http.get(self.url("/projects")).send().await?;
        let projects = check(response).await?.json().await?;

        Ok(projects)
    }

    pub async fn get_project(&self, id: i64) -> Result<Project> {
        let response = self.http.get(self.url(&format!("/projects/{id}"))).send().await?;
        let project = check(response).await?.json().await?;

        Ok(project)
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Project> {
        let response = self
            .http
            .post(self.url("/projects"))
            .json(project)
            .send()
            .await?;
        let created = check(response).await?.json().await?;

        Ok(created)
    }

    pub async fn update_project(&self, id: i64, update: &ProjectUpdate) -> Result<Project> {
        let response = self
            .http
            .put(self.url(&format!("/projects/{id}")))
            .json(update)
            .send()
            .await?;
        let updated = check(response).await?.json().await?;

        Ok(updated)
    }

    pub async fn delete_project(&self, id: i64) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/projects/{id}")))
            .send()
            .await?;
        check(response).await?;

        Ok(())
    }

    // Investment operations
    pub async fn get_investments_by_project(&self, project_id: i64) -> Result<Vec<Investment>> {
        let response = self
            .http
            .get(self.url(&format!("/investments/project/{project_id}")))
            .send()
            .await?;
        let investments = check(response).await?.json().await?;

        Ok(investments)
    }

    pub async fn get_investments_by_investor(&self, name: &str) -> Result<Vec<Investment>> {
        let response = self
            .http
            .get(self.url(&format!("/investments/investor/{name}")))
            .send()
            .await?;
        let investments = check(response).await?.json().await?;

        Ok(investments)
    }

    pub async fn get_investment(&self, id: i64) -> Result<Investment> {
        let response = self
            .http
            .get(self.url(&format!("/investments/{id}")))
            .send()
            .await?;
        let investment = check(response).await?.json().await?;

        Ok(investment)
    }

    pub async fn create_investment(&self, investment: &NewInvestment) -> Result<Investment> {
        let response = self
            .http
            .post(self.url("/investments"))
            .json(investment)
            .send()
            .await?;
        let created = check(response).await?.json().await?;

        Ok(created)
    }

    pub async fn update_investment(
        &self,
        id: i64,
        update: &InvestmentUpdate,
    ) -> Result<Investment> {
        let response = self
            .http
            .put(self.url(&format!("/investments/{id}")))
            .json(update)
            .send()
            .await?;
        let updated = check(response).await?.json().await?;

        Ok(updated)
    }

    pub async fn delete_investment(&self, id: i64) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/investments/{id}")))
            .send()
            .await?;
        check(response).await?;

        Ok(())
    }
}

/// Turn a non-success response into `Error::Server`, preferring the
/// backend's message body over the bare status line.
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    Err(Error::Server {
        status: status.as_u16(),
        message,
    })
}

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::{DashboardSummary, MonitorSummary, SloSummary, SyntheticSummary};

#[derive(Debug, Error)]
pub enum DatadogError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("api returned {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("api response missing data items")]
    MissingData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorClass {
    Auth,
    RateLimit,
    Transient,
    Permanent,
}

#[derive(Clone)]
pub struct DatadogClient {
    http: Client,
    base_url: Url,
    api_key: String,
    app_key: String,
}

impl DatadogClient {
    pub fn with_base_url(
        base_url: &str,
        api_key: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Result<Self, DatadogError> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(base_url)?,
            api_key: api_key.into(),
            app_key: app_key.into(),
        })
    }

    pub async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, DatadogError> {
        let url = self.endpoint("/api/v1/dashboard")?;
        let response = self.authorized(self.http.get(url)).send().await?;
        let payload: DashboardListResponse = Self::handle_response(response).await?;
        Ok(payload.dashboards)
    }

    pub async fn create_dashboard<T: Serialize + ?Sized>(
        &self,
        dashboard: &T,
    ) -> Result<DashboardSummary, DatadogError> {
        let url = self.endpoint("/api/v1/dashboard")?;
        let response = self
            .authorized(self.http.post(url))
            .json(dashboard)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn update_dashboard<T: Serialize + ?Sized>(
        &self,
        id: &str,
        dashboard: &T,
    ) -> Result<DashboardSummary, DatadogError> {
        let url = self.endpoint(&format!("/api/v1/dashboard/{id}"))?;
        let response = self
            .authorized(self.http.put(url))
            .json(dashboard)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn delete_dashboard(&self, id: &str) -> Result<(), DatadogError> {
        let url = self.endpoint(&format!("/api/v1/dashboard/{id}"))?;
        let response = self.authorized(self.http.delete(url)).send().await?;
        Self::expect_success(response).await
    }

    /// The `name` filter is applied server-side as a loose substring match.
    pub async fn list_monitors(
        &self,
        name: Option<&str>,
    ) -> Result<Vec<MonitorSummary>, DatadogError> {
        let mut url = self.endpoint("/api/v1/monitor")?;
        if let Some(name) = name {
            url.query_pairs_mut().append_pair("name", name);
        }
        let response = self.authorized(self.http.get(url)).send().await?;
        Self::handle_response(response).await
    }

    pub async fn create_monitor<T: Serialize + ?Sized>(
        &self,
        monitor: &T,
    ) -> Result<MonitorSummary, DatadogError> {
        let url = self.endpoint("/api/v1/monitor")?;
        let response = self
            .authorized(self.http.post(url))
            .json(monitor)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn update_monitor<T: Serialize + ?Sized>(
        &self,
        id: &str,
        monitor: &T,
    ) -> Result<MonitorSummary, DatadogError> {
        let url = self.endpoint(&format!("/api/v1/monitor/{id}"))?;
        let response = self
            .authorized(self.http.put(url))
            .json(monitor)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn delete_monitor(&self, id: &str) -> Result<(), DatadogError> {
        let url = self.endpoint(&format!("/api/v1/monitor/{id}"))?;
        let response = self.authorized(self.http.delete(url)).send().await?;
        Self::expect_success(response).await
    }

    pub async fn list_slos(&self) -> Result<Vec<SloSummary>, DatadogError> {
        let url = self.endpoint("/api/v1/slo")?;
        let response = self.authorized(self.http.get(url)).send().await?;
        let payload: SloListResponse = Self::handle_response(response).await?;
        Ok(payload.data)
    }

    pub async fn create_slo<T: Serialize + ?Sized>(
        &self,
        slo: &T,
    ) -> Result<SloSummary, DatadogError> {
        let url = self.endpoint("/api/v1/slo")?;
        let response = self
            .authorized(self.http.post(url))
            .json(slo)
            .send()
            .await?;
        let payload: SloListResponse = Self::handle_response(response).await?;
        payload
            .data
            .into_iter()
            .next()
            .ok_or(DatadogError::MissingData)
    }

    pub async fn update_slo<T: Serialize + ?Sized>(
        &self,
        id: &str,
        slo: &T,
    ) -> Result<(), DatadogError> {
        let url = self.endpoint(&format!("/api/v1/slo/{id}"))?;
        let response = self
            .authorized(self.http.put(url))
            .json(slo)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    pub async fn delete_slo(&self, id: &str) -> Result<(), DatadogError> {
        let url = self.endpoint(&format!("/api/v1/slo/{id}"))?;
        let response = self.authorized(self.http.delete(url)).send().await?;
        Self::expect_success(response).await
    }

    pub async fn list_synthetics(&self) -> Result<Vec<SyntheticSummary>, DatadogError> {
        let url = self.endpoint("/api/v1/synthetics/tests")?;
        let response = self.authorized(self.http.get(url)).send().await?;
        let payload: SyntheticListResponse = Self::handle_response(response).await?;
        Ok(payload.tests)
    }

    pub async fn create_synthetic<T: Serialize + ?Sized>(
        &self,
        synthetic: &T,
    ) -> Result<SyntheticSummary, DatadogError> {
        let url = self.endpoint("/api/v1/synthetics/tests")?;
        let response = self
            .authorized(self.http.post(url))
            .json(synthetic)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn update_synthetic<T: Serialize + ?Sized>(
        &self,
        public_id: &str,
        synthetic: &T,
    ) -> Result<SyntheticSummary, DatadogError> {
        let url = self.endpoint(&format!("/api/v1/synthetics/tests/{public_id}"))?;
        let response = self
            .authorized(self.http.put(url))
            .json(synthetic)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn delete_synthetic(&self, public_id: &str) -> Result<(), DatadogError> {
        let url = self.endpoint("/api/v1/synthetics/tests/delete")?;
        let body = SyntheticDeleteRequest {
            public_ids: vec![public_id],
        };
        let response = self
            .authorized(self.http.post(url))
            .json(&body)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("DD-API-KEY", &self.api_key)
            .header("DD-APPLICATION-KEY", &self.app_key)
    }

    fn endpoint(&self, path: &str) -> Result<Url, DatadogError> {
        Ok(self.base_url.join(path)?)
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DatadogError> {
        if response.status().is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(DatadogError::Api { status, body })
        }
    }

    async fn expect_success(response: reqwest::Response) -> Result<(), DatadogError> {
        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(DatadogError::Api { status, body })
        }
    }
}

impl DatadogError {
    pub fn classification(&self) -> Option<ApiErrorClass> {
        match self {
            DatadogError::Api { status, .. } => Some(classify_api_status(*status)),
            _ => None,
        }
    }
}

fn classify_api_status(status: StatusCode) -> ApiErrorClass {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        ApiErrorClass::Auth
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        ApiErrorClass::RateLimit
    } else if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT {
        ApiErrorClass::Transient
    } else {
        ApiErrorClass::Permanent
    }
}

#[derive(Debug, Deserialize)]
struct DashboardListResponse {
    #[serde(default)]
    dashboards: Vec<DashboardSummary>,
}

#[derive(Debug, Deserialize)]
struct SloListResponse {
    #[serde(default)]
    data: Vec<SloSummary>,
}

#[derive(Debug, Deserialize)]
struct SyntheticListResponse {
    #[serde(default)]
    tests: Vec<SyntheticSummary>,
}

#[derive(Debug, Serialize)]
struct SyntheticDeleteRequest<'a> {
    public_ids: Vec<&'a str>,
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, error};

use crate::error::CaseError;
use crate::record::CaseDetails;
use crate::routing::Route;

#[async_trait]
pub trait CaseSource: Send + Sync {
    async fn fetch_case(
        &self,
        route: &Route,
        case_reference: &str,
    ) -> Result<CaseDetails, CaseError>;
}

/// HTTP client for the CXM service API.
#[derive(Clone)]
pub struct CxmClient {
    http: reqwest::Client,
}

impl CxmClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(CxmClient { http })
    }
}

/// `{endpoint}/api/service-api/{segment}/case/{reference}`; the API key is
/// passed separately as a query parameter. Segment and reference are
/// percent-encoded, so a `/`, `?` or `#` in either stays inside its segment.
pub fn case_url(route: &Route, case_reference: &str) -> Result<Url, CaseError> {
    let invalid = |reason: &str| {
        CaseError::UpstreamFetch(format!(
            "invalid CXM endpoint {} - {}",
            route.endpoint, reason
        ))
    };

    let mut url = Url::parse(&route.endpoint).map_err(|e| invalid(&e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("endpoint cannot be a base URL"))?
        .pop_if_empty()
        .extend([
            "api",
            "service-api",
            route.api_path_segment.as_str(),
            "case",
            case_reference,
        ]);
    Ok(url)
}

#[async_trait]
impl CaseSource for CxmClient {
    async fn fetch_case(
        &self,
        route: &Route,
        case_reference: &str,
    ) -> Result<CaseDetails, CaseError> {
        let url = case_url(route, case_reference)?;
        debug!("fetching case from {}", url);

        let response = self
            .http
            .get(url.clone())
            .query(&[("key", route.api_key.as_str())])
            .send()
            .await
            .map_err(|e| CaseError::UpstreamFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!("CXM returned {} for {}", status, url);
            return Err(CaseError::UpstreamFetch(status.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CaseError::UpstreamFetch(e.to_string()))?;

        CaseDetails::parse(body)
            .map_err(|e| CaseError::UpstreamFetch(format!("case body is not valid JSON - {}", e)))
    }
}

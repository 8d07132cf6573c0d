mod endpoints;

use crate::autosave::{FormSubmitter, SaveResponse};
use tracing::debug;

pub(crate) use endpoints::{
    login_redirect_url, normalize_staff_override, save_body, FormEndpoints,
};

/// A save request that never produced an HTTP status.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

/// Talks to the grants site the page was served from.
#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) endpoints: FormEndpoints,
}

impl ApiClient {
    pub fn new(base_url: String, endpoints: FormEndpoints) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl FormSubmitter for ApiClient {
    async fn save(
        &self,
        form_body: &str,
        user_id: &str,
        force: bool,
    ) -> Result<SaveResponse, TransportError> {
        let url = self.url(&self.endpoints.autosave_url(force));
        debug!(%url, "POST autosave");

        let res = reqwest::Client::new()
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=UTF-8",
            )
            .body(save_body(form_body, user_id))
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(SaveResponse { status, body })
    }
}

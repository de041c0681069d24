use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::bookie::Bookie;
use crate::config::CtlConfig;
use crate::errors::{RemoteError, Result};
use crate::namespace::Namespaces;

/// Which of the two REST endpoints a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// The broker admin endpoint (`/admin/...`).
    Admin,
    /// The BookKeeper HTTP endpoint (`/api/v1/...`).
    Bookie,
}

/// HTTP client for the admin and bookie REST endpoints.
///
/// Every request carries the configured bearer token.  Non-2xx responses are
/// turned into [`RemoteError`]s and never retried.
pub struct AdminClient {
    client: Client,
    admin_url: String,
    bookie_url: String,
    auth_token: Option<String>,
}

impl AdminClient {
    /// Builds a client from a resolved configuration.
    pub fn new(config: &CtlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pulsarctl/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(config.tls_allow_insecure)
            .build()?;
        Ok(Self {
            client,
            admin_url: config.admin_service_url.trim_end_matches('/').to_string(),
            bookie_url: config.bookie_service_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone().filter(|token| !token.is_empty()),
        })
    }

    /// Namespace operations.
    pub fn namespaces(&self) -> Namespaces<'_> {
        Namespaces::new(self)
    }

    /// Bookie operations.
    pub fn bookie(&self) -> Bookie<'_> {
        Bookie::new(self)
    }

    /// Constructs a full URL for `path` on `service`, appending `query` pairs in order.
    pub fn endpoint(&self, service: Service, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let base = match service {
            Service::Admin => &self.admin_url,
            Service::Bookie => &self.bookie_url,
        };
        let path = path.strip_prefix('/').unwrap_or(path);
        let mut url = Url::parse(&format!("{}/{}", base, path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Makes a GET request and decodes the JSON body.
    pub async fn get<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(self.client.get(url)).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Makes a GET request where an empty body or `null` means "not set".
    pub async fn get_optional<T>(&self, url: Url) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(self.client.get(url)).await?;
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// Makes a POST request with a JSON body; the response body is ignored.
    pub async fn post<B>(&self, url: Url, body: &B) -> Result<()>
    where
        B: serde::Serialize,
    {
        self.execute(self.client.post(url).json(body)).await?;
        Ok(())
    }

    /// Makes a PUT request without a body; the response body is ignored.
    pub async fn put_empty(&self, url: Url) -> Result<()> {
        self.execute(self.client.put(url)).await?;
        Ok(())
    }

    /// Makes a DELETE request (no body expected).
    pub async fn delete(&self, url: Url) -> Result<()> {
        self.execute(self.client.delete(url)).await?;
        Ok(())
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let request = request.build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.client.execute(request).await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "received response");
        if status.is_success() {
            Ok(response)
        } else {
            Err(remote_error(response).await.into())
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    reason: Option<String>,
}

/// Turns a non-2xx response into a [`RemoteError`].
async fn remote_error(response: Response) -> RemoteError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let reason = reason_from_body(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("No error details")
            .to_string()
    });
    RemoteError {
        code: status.as_u16(),
        reason,
    }
}

fn reason_from_body(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            reason: Some(reason),
        }) => Some(reason),
        _ => Some(body.to_string()),
    }
}

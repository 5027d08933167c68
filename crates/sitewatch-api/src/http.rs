// JSON/REST implementation of the sites gateway.
//
// Base path: configurable, e.g. https://api.example.com/v1/
// Auth: optional `Authorization: Bearer <key>` header

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::gateway::SiteGateway;
use crate::models::{CreateSite, SiteRecord, StatusPatch};
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the remote sites collection.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpGateway {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL, an optional API key, and transport settings.
    ///
    /// The key is injected as a sensitive default header on every request.
    pub fn new(
        base_url: &str,
        api_key: Option<&SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                .map_err(|_| {
                    Error::Config("API key contains characters not allowed in a header".into())
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ensure the base path ends with `/` so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn collection_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join("sites")?)
    }

    /// `{base}/sites/{id}`, with the id percent-encoded as one segment.
    fn item_url(&self, id: &str) -> Result<Url, Error> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp, None).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
        id: &str,
    ) -> Result<T, Error> {
        debug!("PATCH {url}");
        let resp = self.http.patch(url).json(body).send().await?;
        Self::handle_response(resp, Some(id)).await
    }

    async fn delete(&self, url: Url, id: &str) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self.http.delete(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp, Some(id)).await)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        resp: reqwest::Response,
        id: Option<&str>,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp, id).await);
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response, id: Option<&str>) -> Error {
        match (status, id) {
            (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => return Error::Unauthorized,
            (StatusCode::NOT_FOUND, Some(id)) => return Error::NotFound { id: id.to_owned() },
            _ => {}
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl SiteGateway for HttpGateway {
    fn backend_tag(&self) -> &'static str {
        "http"
    }

    async fn list_sites(&self) -> Result<Vec<SiteRecord>, Error> {
        self.get(self.collection_url()?).await
    }

    async fn create_site(&self, input: &CreateSite) -> Result<SiteRecord, Error> {
        self.post(self.collection_url()?, input).await
    }

    async fn delete_site(&self, id: &str) -> Result<(), Error> {
        self.delete(self.item_url(id)?, id).await
    }

    async fn update_site_status(&self, id: &str, status: &str) -> Result<SiteRecord, Error> {
        let body = StatusPatch {
            status: status.to_owned(),
        };
        self.patch(self.item_url(id)?, &body, id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> HttpGateway {
        HttpGateway::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let gw = gateway("https://api.example.com/v1");
        assert_eq!(gw.base_url().as_str(), "https://api.example.com/v1/");
        assert_eq!(
            gw.collection_url().unwrap().as_str(),
            "https://api.example.com/v1/sites"
        );
    }

    #[test]
    fn item_url_encodes_identifier() {
        let gw = gateway("https://api.example.com/");
        assert_eq!(
            gw.item_url("a b/c").unwrap().as_str(),
            "https://api.example.com/sites/a%20b%2Fc"
        );
    }

    #[test]
    fn rejects_cannot_be_a_base_urls() {
        assert!(HttpGateway::from_reqwest("mailto:ops@example.com", reqwest::Client::new()).is_err());
    }

    #[test]
    fn malformed_api_key_is_a_config_error() {
        let key = SecretString::from("bad\nkey");
        let err = HttpGateway::new("https://api.example.com/", Some(&key), &TransportConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}

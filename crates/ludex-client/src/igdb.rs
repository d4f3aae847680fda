use reqwest::{Client, Url};
use serde::Deserialize;

use ludex_core::config::HttpConfig;
use ludex_core::error::AppError;
use ludex_core::models::{PageQuery, RawRecord};
use ludex_core::traits::CatalogSource;

/// Default base URL of the IGDB v4 API.
pub const DEFAULT_BASE_URL: &str = "https://api.igdb.com/v4/";

/// Field selection shared by every list request.
///
/// IGDB returns only what the Apicalypse query names; this is the full set
/// the normalizer consumes.
const FIELDS: &str = "fields id,slug,name,summary,cover.url,alternative_names.name;";

/// Response body of the `games/count` endpoint.
#[derive(Deserialize, Debug)]
struct CountResponse {
    count: u64,
}

/// HTTP client for the IGDB catalog API.
///
/// IGDB (Internet Game Database) exposes its catalog through POST endpoints
/// that take Apicalypse query strings as the request body and authenticate
/// with a Twitch client id plus a bearer token.
///
/// # Examples
///
/// ```no_run
/// use ludex_client::IgdbClient;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = IgdbClient::new("my-client-id".into(), "my-token".into())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct IgdbClient {
    client: Client,
    base_url: Url,
    client_id: String,
    token: String,
}

impl IgdbClient {
    /// Creates a client against the production IGDB endpoint.
    ///
    /// # Arguments
    ///
    /// * `client_id` - Twitch application client id, sent as `Client-ID`
    /// * `token` - OAuth2 access token, sent as a bearer token
    ///
    /// # Errors
    ///
    /// Returns `AppError::Client` if the HTTP client cannot be built.
    pub fn new(client_id: String, token: String) -> Result<Self, AppError> {
        Self::with_base_url(client_id, token, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Generic` if the URL is invalid or malformed.
    /// Returns `AppError::Client` if the HTTP client cannot be built.
    pub fn with_base_url(
        client_id: String,
        token: String,
        base_url_str: &str,
    ) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url_str)
            .map_err(|_| AppError::Generic(format!("Invalid IGDB URL: {}", base_url_str)))?;

        let http_config = HttpConfig::default();
        let client = Client::builder()
            .user_agent(http_config.user_agent)
            .timeout(http_config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            client_id,
            token,
        })
    }

    async fn post_query(&self, endpoint: &str, body: String) -> Result<reqwest::Response, AppError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| AppError::Generic(e.to_string()))?;

        let resp = self
            .client
            .post(url)
            .header("Client-ID", &self.client_id)
            .bearer_auth(&self.token)
            .body(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AppError::Generic(format!(
                "IGDB API error on {}: HTTP {}",
                endpoint,
                resp.status()
            )));
        }

        Ok(resp)
    }
}

impl CatalogSource for IgdbClient {
    async fn count(&self) -> Result<u64, AppError> {
        let resp = self.post_query("games/count", count_query()).await?;
        let body: CountResponse = resp.json().await?;
        Ok(body.count)
    }

    async fn fetch_page(&self, query: PageQuery) -> Result<Vec<RawRecord>, AppError> {
        let resp = self.post_query("games", page_query(query)).await?;
        let records: Vec<RawRecord> = resp.json().await?;
        Ok(records)
    }
}

/// Apicalypse body of a count request.
///
/// Uses the same predicate shape as the list queries so the count and the
/// walk see the same record set.
fn count_query() -> String {
    "where id > -1;".to_string()
}

/// Apicalypse body of one page request.
///
/// `sort id asc` makes offsets within a window address disjoint slices of
/// the filtered id range while the window is in flight.
fn page_query(query: PageQuery) -> String {
    format!(
        "{FIELDS} where id > {}; sort id asc; limit {}; offset {};",
        query.after_id, query.limit, query.offset
    )
}

//!
//! src/fetch.rs  Andrew Belles  Oct 14th, 2026
//!
//! Defines methods for hitting the Spotify endpoints the catalog
//! fetcher needs and decoding their responses. No retries
//!

use async_trait::async_trait;
use reqwest::{Client, header, redirect, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use tokio::sync::OnceCell;
use url::Url;

use crate::config::{ensure_host, HttpConfig, SpotifyConfig};
use crate::errors::FetchError;

/// Page size for artist release and release track listings (API max)
pub const LISTING_LIMIT: u32 = 50;
pub const RELEASE_GROUPS: &str = "album,single";

/// Spotify paging object, `next` is absent on the last page
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedRelease {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub album_type: Option<String>
}

/// Local files come back without an id
#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub isrc: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullTrack {
    pub name: String,
    pub album: AlbumRef,
    #[serde(default)]
    pub external_ids: ExternalIds
}

/// GET /v1/tracks answers with null for ids it cannot serve
#[derive(Debug, Deserialize)]
struct TracksBatch {
    tracks: Vec<Option<FullTrack>>
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String
}

/// What the catalog fetcher needs from the metadata service
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Releases of type album or single. `next` is the link from the
    /// previous page, None for the first page
    async fn artist_releases(&self, artist_id: &str, next: Option<&str>) ->
        Result<Page<SimplifiedRelease>, FetchError>;

    async fn release_tracks(&self, release_id: &str, next: Option<&str>) ->
        Result<Page<SimplifiedTrack>, FetchError>;

    /// One entry per requested id, in request order, None when unavailable
    async fn tracks(&self, ids: &[String]) -> Result<Vec<Option<FullTrack>>, FetchError>;
}

/// Accepts `spotify:artist:<id>`, an open.spotify.com artist link or a bare id
pub fn artist_id_from_handle(handle: &str) -> Result<String, FetchError> {
    let handle = handle.trim();
    let id = if let Some(rest) = handle.strip_prefix("spotify:artist:") {
        rest.to_string()
    } else if handle.starts_with("http") {
        let url = Url::parse(handle)
            .map_err(|e| FetchError::Parse(format!("artist link {handle}: {e}")))?;
        let mut segments = url.path_segments().into_iter().flatten();
        match (segments.next(), segments.next()) {
            (Some("artist"), Some(id)) => id.to_string(),
            _ => return Err(FetchError::Parse(format!("not an artist link: {handle}"))),
        }
    } else {
        handle.to_string()
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FetchError::Parse(format!("invalid artist id in {handle}")));
    }
    Ok(id)
}

/// Client building functionality
fn client_helper(http: &HttpConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .pool_max_idle_per_host(http.pool_max_idle_per_host)
        .pool_idle_timeout(Some(http.pool_idle_timeout))
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
}

pub fn base_client(http: &HttpConfig) -> Result<Client, FetchError> {
    let mut h = header::HeaderMap::new();
    h.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    client_helper(http)
        .default_headers(h)
        .build()
        .map_err(|e| FetchError::Http(format!("build client: {e}")))
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, FetchError> {
    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Status { status: status.as_u16(), body });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub struct SpotifyClient {
    http: Client,
    cfg: SpotifyConfig,
    bearer: OnceCell<String>
}

impl SpotifyClient {
    pub fn new(http_config: &HttpConfig, cfg: &SpotifyConfig) -> Result<Self, FetchError> {
        let http = base_client(http_config)?;
        Ok( Self {
            http,
            cfg: cfg.clone(),
            bearer: OnceCell::new()
        })
    }

    pub fn token_request(&self) -> RequestBuilder {
        self.http
            .post(self.cfg.token_url.clone())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
    }

    /// Client credentials token, requested on first use and kept for the run
    pub async fn bearer(&self) -> Result<&str, FetchError> {
        let token = self.bearer.get_or_try_init(|| self.request_token()).await?;
        Ok(token.as_str())
    }

    async fn request_token(&self) -> Result<String, FetchError> {
        let client_id = self.cfg.client_id.as_deref()
            .ok_or_else(|| FetchError::Auth("SPOTIFY_CLIENT_ID was not set".to_string()))?;
        let client_secret = self.cfg.client_secret.as_deref()
            .ok_or_else(|| FetchError::Auth("SPOTIFY_CLIENT_SECRET was not set".to_string()))?;

        let token: TokenResponse = send_json(
            self.token_request().basic_auth(client_id, Some(client_secret))
        ).await.map_err(|e| FetchError::Auth(format!("token request: {e}")))?;

        tracing::debug!("spotify.token.acquired");
        Ok(token.access_token)
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.cfg.api_base.join(path)
            .map_err(|e| FetchError::Parse(format!("join {path}: {e}")))
    }

    /// Paging links are only followed back to the configured API host
    fn follow(&self, next: &str, bearer: &str) -> Result<RequestBuilder, FetchError> {
        let url = Url::parse(next)
            .map_err(|e| FetchError::Parse(format!("next link {next}: {e}")))?;
        let host = self.cfg.api_base.host_str().unwrap_or_default();
        ensure_host(&url, host).map_err(FetchError::Parse)?;
        Ok(self.http.get(url).bearer_auth(bearer))
    }

    /// GET /v1/artists/{id}/albums?include_groups=album,single&limit=
    pub fn artist_albums(&self, artist_id: &str, bearer: &str) ->
        Result<RequestBuilder, FetchError> {
        let url = self.endpoint(&format!("artists/{artist_id}/albums"))?;
        let limit = LISTING_LIMIT.to_string();
        Ok(self.http.get(url).bearer_auth(bearer).query(&[
            ("include_groups", RELEASE_GROUPS),
            ("limit", limit.as_str())
        ]))
    }

    /// GET /v1/albums/{id}/tracks?limit=
    pub fn album_tracks(&self, album_id: &str, bearer: &str) ->
        Result<RequestBuilder, FetchError> {
        let url = self.endpoint(&format!("albums/{album_id}/tracks"))?;
        let limit = LISTING_LIMIT.to_string();
        Ok(self.http.get(url).bearer_auth(bearer).query(&[("limit", limit.as_str())]))
    }

    /// GET /v1/tracks?ids=...
    pub fn batch_track(&self, ids_csv: &str, bearer: &str) -> Result<RequestBuilder, FetchError> {
        let url = self.endpoint("tracks")?;
        Ok(self.http.get(url).bearer_auth(bearer).query(&[("ids", ids_csv)]))
    }
}

#[async_trait]
impl CatalogApi for SpotifyClient {
    async fn artist_releases(&self, artist_id: &str, next: Option<&str>) ->
        Result<Page<SimplifiedRelease>, FetchError> {
        let bearer = self.bearer().await?;
        let request = match next {
            Some(link) => self.follow(link, bearer)?,
            None => self.artist_albums(artist_id, bearer)?,
        };
        send_json(request).await
    }

    async fn release_tracks(&self, release_id: &str, next: Option<&str>) ->
        Result<Page<SimplifiedTrack>, FetchError> {
        let bearer = self.bearer().await?;
        let request = match next {
            Some(link) => self.follow(link, bearer)?,
            None => self.album_tracks(release_id, bearer)?,
        };
        send_json(request).await
    }

    async fn tracks(&self, ids: &[String]) -> Result<Vec<Option<FullTrack>>, FetchError> {
        let bearer = self.bearer().await?;
        let batch: TracksBatch = send_json(self.batch_track(&ids.join(","), bearer)?).await?;
        Ok(batch.tracks)
    }
}

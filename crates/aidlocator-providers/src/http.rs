//! `reqwest`-backed implementation of [`GeoDataProvider`].
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    AmenityQuery, DirectoryResponse, GeoDataProvider, NominatimPlace, OverpassResponse,
    ProviderConfig, ProviderError, ProviderKind, Result, ReversePlace, SocialServicesResponse,
    raw::view_box,
};

/// Live HTTP clients for all four providers, sharing one connection pool.
#[derive(Debug, Clone)]
pub struct HttpProviders {
    client: Client,
    config: ProviderConfig,
}

impl HttpProviders {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ProviderConfig::from_env())
    }

    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn credential(&self, provider: ProviderKind) -> Result<&str> {
        let key = match provider {
            ProviderKind::SocialServices => self.config.social_services_api_key.as_deref(),
            ProviderKind::ResourceDirectory => self.config.resource_directory_api_key.as_deref(),
            ProviderKind::Overpass | ProviderKind::Nominatim => return Ok(""),
        };
        key.ok_or(ProviderError::MissingCredential { provider })
    }
}

/// Send a request and decode a JSON body, mapping failures to [`ProviderError`].
async fn fetch_json<T: DeserializeOwned>(provider: ProviderKind, request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::from_status(provider, status.as_u16()));
    }
    let body = response.text().await?;
    debug!(%provider, bytes = body.len(), "Received provider response");
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl GeoDataProvider for HttpProviders {
    #[instrument(name = "Overpass amenity search", skip(self), fields(token = query.token()), level = "debug")]
    async fn amenity_search(
        &self,
        latitude: f64,
        longitude: f64,
        query: &AmenityQuery,
        radius_m: u32,
    ) -> Result<OverpassResponse> {
        let ql = query.to_overpass_ql(
            latitude,
            longitude,
            radius_m,
            self.config.request_timeout.as_secs(),
        );
        let request = self
            .client
            .post(&self.config.overpass_url)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(ql);
        fetch_json(ProviderKind::Overpass, request).await
    }

    #[instrument(name = "Nominatim text search", skip(self), level = "debug")]
    async fn text_search(
        &self,
        latitude: f64,
        longitude: f64,
        phrase: &str,
    ) -> Result<Vec<NominatimPlace>> {
        let url = format!("{}/search", self.config.nominatim_url);
        let viewbox = view_box(latitude, longitude, self.config.bounding_box_offset);
        let limit = self.config.text_search_limit.to_string();
        let request = self.client.get(url).query(&[
            ("format", "json"),
            ("q", phrase),
            ("viewbox", viewbox.as_str()),
            ("bounded", "1"),
            ("limit", limit.as_str()),
            ("addressdetails", "1"),
            ("extratags", "1"),
        ]);
        fetch_json(ProviderKind::Nominatim, request).await
    }

    #[instrument(name = "Nominatim reverse geocode", skip(self), level = "debug")]
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<ReversePlace> {
        let url = format!("{}/reverse", self.config.nominatim_url);
        let (lat, lon) = (latitude.to_string(), longitude.to_string());
        let request = self.client.get(url).query(&[
            ("format", "json"),
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("zoom", "18"),
            ("addressdetails", "1"),
        ]);
        fetch_json(ProviderKind::Nominatim, request).await
    }

    #[instrument(name = "Social services search", skip(self), level = "debug")]
    async fn social_services(
        &self,
        latitude: f64,
        longitude: f64,
        service_type: &str,
    ) -> Result<SocialServicesResponse> {
        let key = self.credential(ProviderKind::SocialServices)?;
        let url = format!("{}/search", self.config.social_services_url);
        let (lat, lon) = (latitude.to_string(), longitude.to_string());
        let radius = self.config.social_services_radius_miles.to_string();
        let request = self.client.get(url).bearer_auth(key).query(&[
            ("latitude", lat.as_str()),
            ("longitude", lon.as_str()),
            ("radius", radius.as_str()),
            ("service_type", service_type),
        ]);
        fetch_json(ProviderKind::SocialServices, request).await
    }

    #[instrument(name = "Resource directory search", skip(self), level = "debug")]
    async fn resource_directory(
        &self,
        latitude: f64,
        longitude: f64,
        category: &str,
    ) -> Result<DirectoryResponse> {
        let key = self.credential(ProviderKind::ResourceDirectory)?;
        let url = format!("{}/search", self.config.resource_directory_url);
        let (lat, lon) = (latitude.to_string(), longitude.to_string());
        let per_page = self.config.directory_page_size.to_string();
        let request = self.client.get(url).bearer_auth(key).query(&[
            ("latitude", lat.as_str()),
            ("longitude", lon.as_str()),
            ("category", category),
            ("per_page", per_page.as_str()),
        ]);
        fetch_json(ProviderKind::ResourceDirectory, request).await
    }
}

//! In-memory provider and payload builders for tests.
//!
//! [`ScriptedProvider`] answers every [`GeoDataProvider`] call from a fixed
//! script and records the calls it received, so pipeline tests can exercise
//! fan-out ordering, partial failures and fallbacks without a network.
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    AmenityQuery, DirectoryOrganization, DirectoryResponse, GeoDataProvider, NominatimPlace,
    OverpassElement, OverpassResponse, ProviderError, ProviderKind, RawId, Result, ReversePlace,
    SocialServiceRecord, SocialServicesResponse,
};

/// What an unscripted call returns.
#[derive(Debug, Clone, Default)]
pub enum Unscripted {
    /// An empty but successful payload
    #[default]
    Empty,
    /// The given error
    Fail(ProviderError),
}

/// One call received by a [`ScriptedProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub provider: ProviderKind,
    /// Amenity token, search phrase, service type or category
    pub token: String,
}

#[derive(Debug, Default)]
pub struct ScriptedProvider {
    amenity: HashMap<String, Result<OverpassResponse>>,
    text: HashMap<String, Result<Vec<NominatimPlace>>>,
    reverse: Option<Result<ReversePlace>>,
    social_services: Option<Result<SocialServicesResponse>>,
    directory: Option<Result<DirectoryResponse>>,
    unscripted: Unscripted,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    /// Every call succeeds with an empty payload.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every unscripted call fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            unscripted: Unscripted::Fail(error),
            ..Self::default()
        }
    }

    pub fn with_amenity(mut self, token: &str, elements: Vec<OverpassElement>) -> Self {
        self.amenity
            .insert(token.to_string(), Ok(OverpassResponse { elements }));
        self
    }

    pub fn with_amenity_error(mut self, token: &str, error: ProviderError) -> Self {
        self.amenity.insert(token.to_string(), Err(error));
        self
    }

    pub fn with_text(mut self, phrase: &str, places: Vec<NominatimPlace>) -> Self {
        self.text.insert(phrase.to_string(), Ok(places));
        self
    }

    pub fn with_text_error(mut self, phrase: &str, error: ProviderError) -> Self {
        self.text.insert(phrase.to_string(), Err(error));
        self
    }

    pub fn with_reverse(mut self, result: Result<ReversePlace>) -> Self {
        self.reverse = Some(result);
        self
    }

    pub fn with_social_services(mut self, result: Result<SocialServicesResponse>) -> Self {
        self.social_services = Some(result);
        self
    }

    pub fn with_directory(mut self, result: Result<DirectoryResponse>) -> Self {
        self.directory = Some(result);
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls received for one provider.
    pub fn call_count(&self, provider: ProviderKind) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.provider == provider)
            .count()
    }

    fn record(&self, provider: ProviderKind, token: &str) {
        debug!(%provider, token, "Scripted provider call");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                provider,
                token: token.to_string(),
            });
    }

    fn answer<T: Clone + Default>(&self, scripted: Option<&Result<T>>) -> Result<T> {
        match (scripted, &self.unscripted) {
            (Some(result), _) => result.clone(),
            (None, Unscripted::Empty) => Ok(T::default()),
            (None, Unscripted::Fail(error)) => Err(error.clone()),
        }
    }
}

#[async_trait]
impl GeoDataProvider for ScriptedProvider {
    async fn amenity_search(
        &self,
        _latitude: f64,
        _longitude: f64,
        query: &AmenityQuery,
        _radius_m: u32,
    ) -> Result<OverpassResponse> {
        self.record(ProviderKind::Overpass, query.token());
        self.answer(self.amenity.get(query.token()))
    }

    async fn text_search(
        &self,
        _latitude: f64,
        _longitude: f64,
        phrase: &str,
    ) -> Result<Vec<NominatimPlace>> {
        self.record(ProviderKind::Nominatim, phrase);
        self.answer(self.text.get(phrase))
    }

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<ReversePlace> {
        self.record(ProviderKind::Nominatim, &format!("reverse:{latitude},{longitude}"));
        self.answer(self.reverse.as_ref())
    }

    async fn social_services(
        &self,
        _latitude: f64,
        _longitude: f64,
        service_type: &str,
    ) -> Result<SocialServicesResponse> {
        self.record(ProviderKind::SocialServices, service_type);
        self.answer(self.social_services.as_ref())
    }

    async fn resource_directory(
        &self,
        _latitude: f64,
        _longitude: f64,
        category: &str,
    ) -> Result<DirectoryResponse> {
        self.record(ProviderKind::ResourceDirectory, category);
        self.answer(self.directory.as_ref())
    }
}

/// OSM node with the given tags.
pub fn osm_node(id: i64, latitude: f64, longitude: f64, tags: &[(&str, &str)]) -> OverpassElement {
    OverpassElement {
        kind: "node".to_string(),
        id,
        lat: Some(latitude),
        lon: Some(longitude),
        center: None,
        geometry: Vec::new(),
        tags: tags
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    }
}

/// Nominatim search candidate with a `class`/`type` pair.
pub fn nominatim_place(
    place_id: i64,
    display_name: &str,
    latitude: f64,
    longitude: f64,
    class: &str,
    kind: &str,
) -> NominatimPlace {
    NominatimPlace {
        place_id: Some(RawId::Number(place_id)),
        display_name: Some(display_name.to_string()),
        lat: Some(latitude),
        lon: Some(longitude),
        class: Some(class.to_string()),
        kind: Some(kind.to_string()),
        ..NominatimPlace::default()
    }
}

pub fn social_service(
    id: i64,
    name: &str,
    service_type: &str,
    latitude: f64,
    longitude: f64,
) -> SocialServiceRecord {
    SocialServiceRecord {
        id: Some(RawId::Number(id)),
        name: Some(name.to_string()),
        service_type: Some(service_type.to_string()),
        latitude: Some(latitude),
        longitude: Some(longitude),
        ..SocialServiceRecord::default()
    }
}

pub fn directory_organization(
    id: i64,
    name: &str,
    category: &str,
    latitude: f64,
    longitude: f64,
) -> DirectoryOrganization {
    DirectoryOrganization {
        id: Some(RawId::Number(id)),
        name: Some(name.to_string()),
        category: Some(category.to_string()),
        latitude: Some(latitude),
        longitude: Some(longitude),
        ..DirectoryOrganization::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_answers_and_records() {
        let provider = ScriptedProvider::empty()
            .with_amenity("food_bank", vec![osm_node(1, 1.0, 2.0, &[("name", "Pantry")])])
            .with_text_error(
                "soup kitchen",
                ProviderError::from_status(ProviderKind::Nominatim, 429),
            );

        let hit = provider
            .amenity_search(0.0, 0.0, &AmenityQuery::tag("food_bank"), 100)
            .await
            .unwrap();
        assert_eq!(hit.elements.len(), 1);

        let miss = provider
            .amenity_search(0.0, 0.0, &AmenityQuery::Healthcare, 100)
            .await
            .unwrap();
        assert!(miss.elements.is_empty());

        let err = provider
            .text_search(0.0, 0.0, "soup kitchen")
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());

        assert_eq!(provider.call_count(ProviderKind::Overpass), 2);
        assert_eq!(provider.calls()[2].token, "soup kitchen");
    }

    #[tokio::test]
    async fn test_failing_provider() {
        let provider = ScriptedProvider::failing(ProviderError::Timeout);
        assert_eq!(
            provider.reverse_geocode(1.0, 1.0).await.unwrap_err(),
            ProviderError::Timeout
        );
        assert!(provider.social_services(1.0, 1.0, "food").await.is_err());
    }
}

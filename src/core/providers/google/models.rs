//! Google Maps web service response shapes
//!
//! Only the fields the estimator reads are modelled; everything else in the
//! payload is ignored.

use crate::core::providers::{ProviderError, RouteLeg};
use crate::core::types::PlaceSuggestion;
use serde::Deserialize;

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
pub(super) struct TextValue {
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DirectionsRoute {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub legs: Vec<RouteMeasure>,
}

/// A directions leg or a distance matrix element
#[derive(Debug, Deserialize)]
pub(super) struct RouteMeasure {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub distance: Option<TextValue>,
    #[serde(default)]
    pub duration: Option<TextValue>,
    #[serde(default)]
    pub duration_in_traffic: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DistanceMatrixResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub rows: Vec<DistanceMatrixRow>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DistanceMatrixRow {
    #[serde(default)]
    pub elements: Vec<RouteMeasure>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Prediction {
    pub description: String,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub structured_formatting: Option<StructuredFormatting>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StructuredFormatting {
    pub main_text: String,
}

fn check_status(status: &str, error_message: Option<String>) -> Result<(), ProviderError> {
    if status == STATUS_OK {
        Ok(())
    } else {
        Err(ProviderError::from_status(status, error_message))
    }
}

fn whole_units(value: Option<&TextValue>, field: &str) -> Result<u64, ProviderError> {
    match value {
        Some(v) if v.value.is_finite() && v.value >= 0.0 => Ok(v.value.round() as u64),
        Some(_) => Err(ProviderError::MalformedResponse(format!("invalid {}", field))),
        None => Err(ProviderError::MalformedResponse(format!("missing {}", field))),
    }
}

impl RouteMeasure {
    fn into_leg(self, summary: Option<String>) -> Result<RouteLeg, ProviderError> {
        Ok(RouteLeg {
            distance_meters: whole_units(self.distance.as_ref(), "distance")?,
            duration_seconds: whole_units(self.duration.as_ref(), "duration")?,
            duration_in_traffic_seconds: match self.duration_in_traffic {
                Some(ref value) => Some(whole_units(Some(value), "duration_in_traffic")?),
                None => None,
            },
            summary,
        })
    }
}

impl DirectionsResponse {
    pub(super) fn into_leg(self) -> Result<RouteLeg, ProviderError> {
        check_status(&self.status, self.error_message)?;

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("no routes returned".to_string()))?;
        let summary = route.summary.filter(|s| !s.trim().is_empty());
        let leg = route
            .legs
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("route has no legs".to_string()))?;

        leg.into_leg(summary)
    }
}

impl DistanceMatrixResponse {
    pub(super) fn into_leg(self) -> Result<RouteLeg, ProviderError> {
        check_status(&self.status, self.error_message)?;

        let element = self
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("no matrix element returned".to_string())
            })?;

        match element.status.as_deref() {
            Some(STATUS_OK) | None => element.into_leg(None),
            Some(status) => Err(ProviderError::from_status(status, None)),
        }
    }
}

impl AutocompleteResponse {
    pub(super) fn into_suggestions(self) -> Result<Vec<PlaceSuggestion>, ProviderError> {
        if self.status == STATUS_ZERO_RESULTS {
            return Ok(Vec::new());
        }
        check_status(&self.status, self.error_message)?;

        Ok(self
            .predictions
            .into_iter()
            .map(|prediction| PlaceSuggestion {
                name: prediction
                    .structured_formatting
                    .map(|f| f.main_text)
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| prediction.description.clone()),
                full_address: prediction.description,
                place_id: prediction.place_id,
                kind: "google".to_string(),
            })
            .collect())
    }
}

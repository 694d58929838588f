use serde::{Deserialize, Serialize};

// --- Geo Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A named place on the map, either a launch site or a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    #[serde(flatten)]
    pub point: GeoPoint,
}

impl Site {
    pub fn new(name: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            point: GeoPoint { lat, lon },
        }
    }
}

// --- News Feed Types ---

/// Known external news origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Gdelt,
    Reuters,
    Bbc,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Gdelt => write!(f, "gdelt"),
            Origin::Reuters => write!(f, "reuters"),
            Origin::Bbc => write!(f, "bbc"),
        }
    }
}

/// One normalized news item in the aggregated timeline.
/// Immutable once emitted, except for the optional translation enrichment
/// applied in place by the translation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    /// Original-language title, written by the translation collaborator
    /// when it swaps a translation into `title`. The aggregation pipeline
    /// always emits None here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_translated: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub source: Origin,
    /// Best-effort publish time; falls back to the aggregation start time
    /// when the origin's date string is unparsable.
    pub timestamp_ms: i64,
}

// --- Simulation Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackStatus {
    InFlight,
    Impacted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Ballistic strike against a primary-catalog target.
    Strike,
    /// Shorter-range rocket against a secondary-catalog target.
    Rocket,
}

/// One simulated point-to-point strike with time-varying progress.
/// `progress` is monotonically non-decreasing while in flight and the
/// status flips to `Impacted` exactly once, at 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub kind: TrackKind,
    pub origin: Site,
    pub destination: Site,
    pub path: Vec<GeoPoint>,
    pub launch_time_ms: i64,
    pub impact_time_ms: Option<i64>,
    pub status: TrackStatus,
    pub progress: f32,
}

/// Short-lived visual artifact created when a track impacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AftermathMarker {
    pub id: String,
    pub location: GeoPoint,
    pub created_at_ms: i64,
    pub ttl_ms: i64,
}

impl AftermathMarker {
    pub fn is_live(&self, now_ms: i64) -> bool {
        now_ms - self.created_at_ms < self.ttl_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    Missile,
    Rocket,
    Interception,
    Retaliation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Success,
}

/// Auxiliary timeline entry synthesized alongside primary tracks:
/// launches, interceptions, retaliatory strikes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub kind: TimelineKind,
    pub title: String,
    pub location: GeoPoint,
    pub time_ms: i64,
    pub severity: Severity,
}

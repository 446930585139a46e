use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::router::RoutingDecision;
use crate::surface::HostEvent;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenUrlRequest {
    pub url: String,
    /// Simulate a host whose search surface cannot be located.
    #[serde(default)]
    pub detached_surface: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContinueActivityRequest {
    pub activity_type: String,
    #[serde(default)]
    pub user_info: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerformShortcutRequest {
    pub identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub preview: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "payload")]
pub enum RouteRequest {
    OpenUrl(OpenUrlRequest),
    ContinueActivity(ContinueActivityRequest),
    PerformShortcut(PerformShortcutRequest),
    Suggestions(SuggestionsRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum DecisionDto {
    SearchRequest { term: String },
    GenericActivity { activity_type: String },
    Unhandled,
}

impl From<&RoutingDecision> for DecisionDto {
    fn from(value: &RoutingDecision) -> Self {
        match value {
            RoutingDecision::SearchRequest { term } => Self::SearchRequest { term: term.clone() },
            RoutingDecision::GenericActivity(activity) => Self::GenericActivity {
                activity_type: activity.activity_type.clone(),
            },
            RoutingDecision::Unhandled => Self::Unhandled,
        }
    }
}

/// The effective decision plus every host-side effect, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteReport {
    pub decision: DecisionDto,
    pub events: Vec<String>,
}

impl RouteReport {
    pub fn new(decision: &RoutingDecision, events: &[HostEvent]) -> Self {
        Self {
            decision: DecisionDto::from(decision),
            events: events.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionsResponse {
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "payload")]
pub enum RouteResponse {
    Route(RouteReport),
    Suggestions(SuggestionsResponse),
}

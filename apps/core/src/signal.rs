use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// Reserved deep-link scheme owned by the app.
pub const APP_SCHEME: &str = "wikipedia";
/// Host of the reserved search deep link (`wikipedia://search`).
pub const APP_SEARCH_HOST: &str = "search";
/// Query parameter carrying the term on the reserved search link.
pub const APP_TERM_PARAM: &str = "term";
/// Opaque correlation parameter on the reserved search link; accepted, unused.
pub const APP_UID_PARAM: &str = "uid";

/// Web-search links are recognized by host fragment and path fragment.
pub const WEB_HOST_FRAGMENT: &str = "wikipedia.org";
pub const WEB_SEARCH_PATH: &str = "/wiki/Special:Search";
pub const WEB_SEARCH_PARAM: &str = "search";

/// User-activity contract for search hand-offs.
pub const SEARCH_ACTIVITY_TYPE: &str = "org.wikimedia.wikipedia.search";
pub const SEARCH_TERM_KEY: &str = "WMFSearchTerm";

/// Payload key stamped onto generically forwarded activities.
pub const ROUTING_SOURCE_KEY: &str = "WMFRoutingSource";
pub const ROUTING_SOURCE_DEEP_LINK: &str = "deepLink";

#[derive(Debug, Clone, PartialEq)]
pub enum SignalError {
    InvalidUrl(String),
}

impl Display for SignalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl(error) => write!(f, "invalid url: {error}"),
        }
    }
}

impl std::error::Error for SignalError {}

/// Any external event that can bring the app to the foreground with context.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivationSignal {
    Link(DeepLink),
    Activity(UserActivityRecord),
    Shortcut(ShortcutItem),
}

/// A parsed inbound URL. Query parameters keep their original order and may
/// repeat; lookups return the first match, percent-decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepLink {
    url: Url,
}

impl DeepLink {
    pub fn parse(raw: &str) -> Result<Self, SignalError> {
        let url = Url::parse(raw).map_err(|error| SignalError::InvalidUrl(error.to_string()))?;
        Ok(Self { url })
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn query_value(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key.as_ref() == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl Display for DeepLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Builds the reserved search link the shortcut/intent layer opens, e.g.
/// `wikipedia://search?term=iOS+Swift&uid=abc`.
pub fn search_link(term: &str, uid: &str) -> DeepLink {
    let base = format!("{APP_SCHEME}://{APP_SEARCH_HOST}");
    let url = Url::parse_with_params(&base, [(APP_TERM_PARAM, term), (APP_UID_PARAM, uid)])
        .expect("reserved search link should always parse");
    DeepLink { url }
}

/// A system user-activity record: a type identifier plus an untyped payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivityRecord {
    pub activity_type: String,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl UserActivityRecord {
    pub fn new(activity_type: &str) -> Self {
        Self {
            activity_type: activity_type.to_string(),
            payload: Map::new(),
        }
    }

    pub fn with_entry(mut self, key: &str, value: Value) -> Self {
        self.payload.insert(key.to_string(), value);
        self
    }

    /// Synthesized search activity, used when a reserved search link cannot
    /// reach the search surface directly.
    pub fn search(term: &str) -> Self {
        Self::new(SEARCH_ACTIVITY_TYPE).with_entry(SEARCH_TERM_KEY, Value::String(term.to_string()))
    }

    pub fn string_entry(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

/// A home-screen shortcut item. Only the identifier matters for routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutItem {
    pub identifier: String,
}

impl ShortcutItem {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
        }
    }
}

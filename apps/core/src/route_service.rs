use std::fmt::{Display, Formatter};

use rusqlite::Connection;

use crate::config::{validate, Config};
use crate::contract::{RouteReport, RouteRequest, RouteResponse, SuggestionsResponse};
use crate::scene::SceneCoordinator;
use crate::shared_store::{self, StoreError};
use crate::signal::{DeepLink, ShortcutItem, UserActivityRecord};
use crate::surface::RecordingHost;

#[derive(Debug)]
pub enum ServiceError {
    Config(String),
    Store(StoreError),
    InvalidRequest(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Store(error) => write!(f, "store error: {error}"),
            Self::InvalidRequest(error) => write!(f, "invalid request: {error}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Executes routing commands against a recording host and keeps the session
/// state alive across commands, so a command sequence behaves like one
/// foreground session.
pub struct RouteService {
    config: Config,
    db: Connection,
    coordinator: SceneCoordinator,
}

impl RouteService {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let db = shared_store::open_from_config(&config)?;
        Ok(Self {
            config,
            db,
            coordinator: SceneCoordinator::new(),
        })
    }

    pub fn with_connection(config: Config, db: Connection) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        Ok(Self {
            config,
            db,
            coordinator: SceneCoordinator::new(),
        })
    }

    pub fn handle_command(&mut self, request: RouteRequest) -> Result<RouteResponse, ServiceError> {
        match request {
            RouteRequest::OpenUrl(request) => {
                let link = DeepLink::parse(&request.url)
                    .map_err(|error| ServiceError::InvalidRequest(error.to_string()))?;
                let mut host = if request.detached_surface {
                    RecordingHost::without_surface()
                } else {
                    RecordingHost::with_surface()
                };
                let decision = self.coordinator.open_url(&link, &mut host);
                // The harness surface is ready as soon as routing returns.
                self.coordinator.surface_ready(&mut host);
                Ok(RouteResponse::Route(RouteReport::new(
                    &decision,
                    &host.events(),
                )))
            }
            RouteRequest::ContinueActivity(request) => {
                let activity = UserActivityRecord {
                    activity_type: request.activity_type,
                    payload: request.user_info,
                };
                let mut host = RecordingHost::with_surface();
                let decision = self.coordinator.continue_activity(&activity, &mut host);
                self.coordinator.surface_ready(&mut host);
                Ok(RouteResponse::Route(RouteReport::new(
                    &decision,
                    &host.events(),
                )))
            }
            RouteRequest::PerformShortcut(request) => {
                let item = ShortcutItem::new(&request.identifier);
                let mut host = RecordingHost::with_surface();
                let decision = self.coordinator.perform_shortcut(&item, &mut host);
                Ok(RouteResponse::Route(RouteReport::new(
                    &decision,
                    &host.events(),
                )))
            }
            RouteRequest::Suggestions(request) => {
                let terms = if request.preview {
                    shared_store::placeholder_suggestions()
                } else {
                    shared_store::recent_search_terms(
                        &self.db,
                        self.config.max_suggestions as usize,
                    )?
                };
                Ok(RouteResponse::Suggestions(SuggestionsResponse { terms }))
            }
        }
    }
}

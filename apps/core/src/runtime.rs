use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::config::{self, ConfigError};
use crate::contract::{
    ContinueActivityRequest, DecisionDto, OpenUrlRequest, PerformShortcutRequest, RouteRequest,
    RouteResponse, SuggestionsRequest,
};
use crate::logging;
use crate::route_service::{RouteService, ServiceError};
use crate::transport;

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Service(ServiceError),
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Service(error) => write!(f, "service error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ServiceError> for RuntimeError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeCommand {
    RouteUrl { url: String, detached: bool },
    ContinueActivity { activity_type: String, user_info: Map<String, Value> },
    PerformShortcut { identifier: String },
    Suggestions { preview: bool },
    Json { payload: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub command: RuntimeCommand,
}

const USAGE: &str = "usage: wikiroute-core [--config <path>] \
route <url> [--detached] | activity <type> [payload-json] | \
shortcut <identifier> | suggestions [--preview] | json <payload>";

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, String> {
    let mut rest = args;
    let mut config_path = None;

    if rest.first().map(String::as_str) == Some("--config") {
        let path = rest
            .get(1)
            .ok_or_else(|| format!("--config requires a path; {USAGE}"))?;
        config_path = Some(PathBuf::from(path));
        rest = &rest[2..];
    }

    let Some(command) = rest.first() else {
        return Err(USAGE.to_string());
    };

    let command = match command.as_str() {
        "route" => {
            let url = rest
                .get(1)
                .ok_or_else(|| format!("route requires a url; {USAGE}"))?
                .clone();
            let detached = rest.get(2).map(String::as_str) == Some("--detached");
            RuntimeCommand::RouteUrl { url, detached }
        }
        "activity" => {
            let activity_type = rest
                .get(1)
                .ok_or_else(|| format!("activity requires a type; {USAGE}"))?
                .clone();
            let user_info = match rest.get(2) {
                Some(raw) => serde_json::from_str::<Map<String, Value>>(raw)
                    .map_err(|error| format!("activity payload must be a JSON object: {error}"))?,
                None => Map::new(),
            };
            RuntimeCommand::ContinueActivity {
                activity_type,
                user_info,
            }
        }
        "shortcut" => {
            let identifier = rest
                .get(1)
                .ok_or_else(|| format!("shortcut requires an identifier; {USAGE}"))?
                .clone();
            RuntimeCommand::PerformShortcut { identifier }
        }
        "suggestions" => RuntimeCommand::Suggestions {
            preview: rest.get(1).map(String::as_str) == Some("--preview"),
        },
        "json" => {
            let payload = rest
                .get(1)
                .ok_or_else(|| format!("json requires a payload; {USAGE}"))?
                .clone();
            RuntimeCommand::Json { payload }
        }
        other => return Err(format!("unknown command '{other}'; {USAGE}")),
    };

    Ok(RuntimeOptions {
        config_path,
        command,
    })
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    if let Err(error) = logging::init() {
        eprintln!("[wikiroute-core] file logging unavailable: {error}");
    }

    let config = config::load(options.config_path.as_deref())?;
    if !config.config_path.exists() {
        config::save(&config)?;
        println!(
            "[wikiroute-core] wrote default config to {}",
            config.config_path.display()
        );
    }
    println!(
        "[wikiroute-core] startup config_path={} shared_store_path={}",
        config.config_path.display(),
        config.shared_store_path.display(),
    );

    let mut service = RouteService::new(config)?;

    match options.command {
        RuntimeCommand::Json { payload } => {
            println!("{}", transport::handle_json(&mut service, &payload));
            Ok(())
        }
        command => {
            let request = request_for_command(command);
            let response = service.handle_command(request)?;
            print_response(&response);
            Ok(())
        }
    }
}

fn request_for_command(command: RuntimeCommand) -> RouteRequest {
    match command {
        RuntimeCommand::RouteUrl { url, detached } => RouteRequest::OpenUrl(OpenUrlRequest {
            url,
            detached_surface: detached,
        }),
        RuntimeCommand::ContinueActivity {
            activity_type,
            user_info,
        } => RouteRequest::ContinueActivity(ContinueActivityRequest {
            activity_type,
            user_info,
        }),
        RuntimeCommand::PerformShortcut { identifier } => {
            RouteRequest::PerformShortcut(PerformShortcutRequest { identifier })
        }
        RuntimeCommand::Suggestions { preview } => {
            RouteRequest::Suggestions(SuggestionsRequest { preview })
        }
        RuntimeCommand::Json { .. } => unreachable!("json commands bypass request building"),
    }
}

fn print_response(response: &RouteResponse) {
    match response {
        RouteResponse::Route(report) => {
            println!("[wikiroute-core] {}", describe_decision(&report.decision));
            for event in &report.events {
                println!("[wikiroute-core] event {event}");
            }
        }
        RouteResponse::Suggestions(payload) => {
            if payload.terms.is_empty() {
                println!("[wikiroute-core] no recent searches");
            }
            for term in &payload.terms {
                println!("[wikiroute-core] suggestion \"{term}\"");
            }
        }
    }
}

fn describe_decision(decision: &DecisionDto) -> String {
    match decision {
        DecisionDto::SearchRequest { term } => format!("decision=search_request term=\"{term}\""),
        DecisionDto::GenericActivity { activity_type } => {
            format!("decision=generic_activity type=\"{activity_type}\"")
        }
        DecisionDto::Unhandled => "decision=unhandled".to_string(),
    }
}

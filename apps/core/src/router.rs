use serde_json::Value;

use crate::logging;
use crate::session::{ResumeAction, SessionState};
use crate::signal::{
    ActivationSignal, DeepLink, ShortcutItem, UserActivityRecord, APP_SCHEME, APP_SEARCH_HOST,
    APP_TERM_PARAM, ROUTING_SOURCE_DEEP_LINK, ROUTING_SOURCE_KEY, SEARCH_ACTIVITY_TYPE,
    SEARCH_TERM_KEY, WEB_HOST_FRAGMENT, WEB_SEARCH_PARAM, WEB_SEARCH_PATH,
};
use crate::surface::{SurfaceHost, SEARCH_SURFACE_INDEX};

/// The classified outcome of interpreting an Activation Signal.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingDecision {
    SearchRequest { term: String },
    GenericActivity(UserActivityRecord),
    Unhandled,
}

/// Pure classification of a signal, first match wins:
/// 1. wikipedia.org web-search URL with a `search` parameter
/// 2. reserved `wikipedia://search` URL with a `term` parameter
/// 3. search-typed user activity with a string `WMFSearchTerm`
/// 4. any other user activity
/// 5. everything else (shortcut items, unmatched or parameter-less URLs)
///
/// No side effects and no collaborator access; `Router::route` may weaken
/// the outcome at dispatch time when a collaborator is absent.
pub fn classify(signal: &ActivationSignal) -> RoutingDecision {
    match signal {
        ActivationSignal::Link(link) => classify_link(link),
        ActivationSignal::Activity(activity) => classify_activity(activity),
        ActivationSignal::Shortcut(_) => RoutingDecision::Unhandled,
    }
}

fn classify_link(link: &DeepLink) -> RoutingDecision {
    if is_web_search_link(link) {
        if let Some(term) = link.query_value(WEB_SEARCH_PARAM) {
            return RoutingDecision::SearchRequest { term };
        }
    }
    if is_app_search_link(link) {
        if let Some(term) = link.query_value(APP_TERM_PARAM) {
            return RoutingDecision::SearchRequest { term };
        }
    }
    RoutingDecision::Unhandled
}

fn classify_activity(activity: &UserActivityRecord) -> RoutingDecision {
    if activity.activity_type == SEARCH_ACTIVITY_TYPE {
        if let Some(term) = activity.string_entry(SEARCH_TERM_KEY) {
            return RoutingDecision::SearchRequest {
                term: term.to_string(),
            };
        }
    }
    RoutingDecision::GenericActivity(activity.clone())
}

fn is_web_search_link(link: &DeepLink) -> bool {
    link.host().contains(WEB_HOST_FRAGMENT) && link.path().contains(WEB_SEARCH_PATH)
}

fn is_app_search_link(link: &DeepLink) -> bool {
    link.scheme() == APP_SCHEME && link.host() == APP_SEARCH_HOST
}

#[derive(Debug, Clone, PartialEq)]
struct StagedSearch {
    term: String,
}

/// Dispatches Activation Signals to the host UI. Holds at most one staged
/// search execution; the search surface may still be under construction when
/// a term is delivered, so execution is deferred until `surface_ready` and a
/// newer activation replaces any staged one instead of racing it.
#[derive(Debug, Default)]
pub struct Router {
    staged: Option<StagedSearch>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_staged_search(&self) -> bool {
        self.staged.is_some()
    }

    /// Routes one signal. Returns the effective decision, which is the pure
    /// classification weakened where a required collaborator was absent.
    pub fn route(
        &mut self,
        signal: &ActivationSignal,
        host: &mut dyn SurfaceHost,
        session: &mut SessionState,
    ) -> RoutingDecision {
        match signal {
            ActivationSignal::Link(link) => self.route_link(link, host, session),
            ActivationSignal::Activity(activity) => self.route_activity(activity, host, session),
            ActivationSignal::Shortcut(item) => self.route_shortcut(item, host),
        }
    }

    /// The host signals that the search surface finished constructing.
    /// Delivers and executes the staged search, if any. Returns the executed
    /// term.
    pub fn surface_ready(&mut self, host: &mut dyn SurfaceHost) -> Option<String> {
        let staged = self.staged.take()?;
        let Some(surface) = host.search_surface() else {
            logging::warn("surface readiness signaled but no search surface is attached");
            return None;
        };
        surface.set_term(&staged.term);
        surface.search();
        Some(staged.term)
    }

    fn route_link(
        &mut self,
        link: &DeepLink,
        host: &mut dyn SurfaceHost,
        session: &mut SessionState,
    ) -> RoutingDecision {
        if is_web_search_link(link) {
            if let Some(term) = link.query_value(WEB_SEARCH_PARAM) {
                if self.begin_search(&term, host, session) {
                    return RoutingDecision::SearchRequest { term };
                }
                logging::warn(&format!(
                    "web search link dropped, search surface unavailable: {link}"
                ));
                return RoutingDecision::Unhandled;
            }
        }

        if is_app_search_link(link) {
            return match link.query_value(APP_TERM_PARAM) {
                Some(term) => {
                    if self.begin_search(&term, host, session) {
                        return RoutingDecision::SearchRequest { term };
                    }
                    // Surface not reachable: hand the term off as a search
                    // activity so the generic processor can still route it.
                    logging::warn(&format!(
                        "search surface unavailable, rerouting app link as activity: {link}"
                    ));
                    self.forward_generic(UserActivityRecord::search(&term), host, session)
                }
                None => {
                    logging::warn(&format!(
                        "app search link missing '{APP_TERM_PARAM}' parameter: {link}"
                    ));
                    RoutingDecision::Unhandled
                }
            };
        }

        logging::info(&format!("unrecognized link left unhandled: {link}"));
        RoutingDecision::Unhandled
    }

    fn route_activity(
        &mut self,
        activity: &UserActivityRecord,
        host: &mut dyn SurfaceHost,
        session: &mut SessionState,
    ) -> RoutingDecision {
        if let RoutingDecision::SearchRequest { term } = classify_activity(activity) {
            if self.begin_search(&term, host, session) {
                return RoutingDecision::SearchRequest { term };
            }
            logging::warn(
                "search surface unavailable, forwarding search activity generically",
            );
        }
        self.forward_generic(activity.clone(), host, session)
    }

    fn route_shortcut(
        &mut self,
        item: &ShortcutItem,
        host: &mut dyn SurfaceHost,
    ) -> RoutingDecision {
        if !host.process_shortcut(item) {
            logging::warn(&format!("shortcut item not handled: {}", item.identifier));
        }
        RoutingDecision::Unhandled
    }

    /// Switches to the search surface and stages execution of `term`.
    /// Returns false when the surface cannot be located, leaving any earlier
    /// staged search in place.
    fn begin_search(
        &mut self,
        term: &str,
        host: &mut dyn SurfaceHost,
        session: &mut SessionState,
    ) -> bool {
        host.select_surface(SEARCH_SURFACE_INDEX);
        let Some(surface) = host.search_surface() else {
            return false;
        };
        surface.set_term(term);
        // Last activation wins; an older staged search is dropped.
        self.staged = Some(StagedSearch {
            term: term.to_string(),
        });
        if session.resume() == ResumeAction::DismissSplash {
            host.dismiss_splash_and_resume();
        }
        true
    }

    fn forward_generic(
        &mut self,
        mut activity: UserActivityRecord,
        host: &mut dyn SurfaceHost,
        session: &mut SessionState,
    ) -> RoutingDecision {
        host.show_splash();
        activity.payload.insert(
            ROUTING_SOURCE_KEY.to_string(),
            Value::String(ROUTING_SOURCE_DEEP_LINK.to_string()),
        );
        host.process_activity(activity.clone());
        match session.resume() {
            ResumeAction::DismissSplash => host.dismiss_splash_and_resume(),
            ResumeAction::AlreadyResumed => host.hide_splash(),
        }
        RoutingDecision::GenericActivity(activity)
    }
}

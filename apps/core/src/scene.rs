use crate::router::{Router, RoutingDecision};
use crate::session::{ResumeAction, SessionState};
use crate::signal::{ActivationSignal, DeepLink, ShortcutItem, UserActivityRecord};
use crate::surface::SurfaceHost;

/// What the scene carried when it connected. A terminated process does not
/// get the individual open-url/continue-activity callbacks, so the cold
/// start has to pick one signal out of the connection payload itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionOptions {
    pub user_activities: Vec<UserActivityRecord>,
    pub urls: Vec<DeepLink>,
    pub shortcut_item: Option<ShortcutItem>,
}

impl ConnectionOptions {
    /// Cold-start signal priority: first user activity, else first URL,
    /// else the shortcut item.
    pub fn primary_signal(&self) -> Option<ActivationSignal> {
        if let Some(activity) = self.user_activities.first() {
            return Some(ActivationSignal::Activity(activity.clone()));
        }
        if let Some(url) = self.urls.first() {
            return Some(ActivationSignal::Link(url.clone()));
        }
        self.shortcut_item
            .as_ref()
            .map(|item| ActivationSignal::Shortcut(item.clone()))
    }
}

/// Owns the router and the session resume state, and exposes entry points
/// shaped like the host scene lifecycle callbacks.
#[derive(Debug, Default)]
pub struct SceneCoordinator {
    router: Router,
    session: SessionState,
}

impl SceneCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Cold-start connection. Routes the primary signal if one is present.
    pub fn connect(
        &mut self,
        options: &ConnectionOptions,
        host: &mut dyn SurfaceHost,
    ) -> RoutingDecision {
        match options.primary_signal() {
            Some(signal) => self.router.route(&signal, host, &mut self.session),
            None => RoutingDecision::Unhandled,
        }
    }

    pub fn open_url(&mut self, link: &DeepLink, host: &mut dyn SurfaceHost) -> RoutingDecision {
        self.router.route(
            &ActivationSignal::Link(link.clone()),
            host,
            &mut self.session,
        )
    }

    pub fn continue_activity(
        &mut self,
        activity: &UserActivityRecord,
        host: &mut dyn SurfaceHost,
    ) -> RoutingDecision {
        self.router.route(
            &ActivationSignal::Activity(activity.clone()),
            host,
            &mut self.session,
        )
    }

    pub fn perform_shortcut(
        &mut self,
        item: &ShortcutItem,
        host: &mut dyn SurfaceHost,
    ) -> RoutingDecision {
        self.router.route(
            &ActivationSignal::Shortcut(item.clone()),
            host,
            &mut self.session,
        )
    }

    /// Scene became active: dismiss the splash screen if this session still
    /// needs it. Safe to call repeatedly.
    pub fn became_active(&mut self, host: &mut dyn SurfaceHost) {
        if self.session.resume() == ResumeAction::DismissSplash {
            host.dismiss_splash_and_resume();
        }
    }

    /// The search surface finished constructing; execute any staged search.
    pub fn surface_ready(&mut self, host: &mut dyn SurfaceHost) -> Option<String> {
        self.router.surface_ready(host)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectionOptions, SceneCoordinator};
    use crate::router::RoutingDecision;
    use crate::signal::{ActivationSignal, DeepLink, ShortcutItem, UserActivityRecord};
    use crate::surface::{HostEvent, RecordingHost};

    fn options_with_everything() -> ConnectionOptions {
        ConnectionOptions {
            user_activities: vec![UserActivityRecord::new("org.wikimedia.wikipedia.article")],
            urls: vec![DeepLink::parse("wikipedia://search?term=Swift").unwrap()],
            shortcut_item: Some(ShortcutItem::new("search-shortcut")),
        }
    }

    #[test]
    fn primary_signal_prefers_activities_then_urls_then_shortcuts() {
        let mut options = options_with_everything();
        assert!(matches!(
            options.primary_signal(),
            Some(ActivationSignal::Activity(_))
        ));

        options.user_activities.clear();
        assert!(matches!(
            options.primary_signal(),
            Some(ActivationSignal::Link(_))
        ));

        options.urls.clear();
        assert!(matches!(
            options.primary_signal(),
            Some(ActivationSignal::Shortcut(_))
        ));

        options.shortcut_item = None;
        assert_eq!(options.primary_signal(), None);
    }

    #[test]
    fn connect_routes_the_primary_signal() {
        let mut coordinator = SceneCoordinator::new();
        let mut host = RecordingHost::with_surface();

        let options = ConnectionOptions {
            urls: vec![DeepLink::parse("wikipedia://search?term=Swift").unwrap()],
            ..Default::default()
        };
        let decision = coordinator.connect(&options, &mut host);

        assert_eq!(
            decision,
            RoutingDecision::SearchRequest {
                term: "Swift".into()
            }
        );
        assert_eq!(
            coordinator.surface_ready(&mut host).as_deref(),
            Some("Swift")
        );
    }

    #[test]
    fn connect_without_signals_is_unhandled() {
        let mut coordinator = SceneCoordinator::new();
        let mut host = RecordingHost::with_surface();

        let decision = coordinator.connect(&ConnectionOptions::default(), &mut host);

        assert_eq!(decision, RoutingDecision::Unhandled);
        assert!(host.events().is_empty());
        assert!(coordinator.session().needs_resume());
    }

    #[test]
    fn became_active_resumes_at_most_once() {
        let mut coordinator = SceneCoordinator::new();
        let mut host = RecordingHost::with_surface();

        coordinator.became_active(&mut host);
        coordinator.became_active(&mut host);

        assert_eq!(host.events(), vec![HostEvent::Resumed]);
        assert!(!coordinator.session().needs_resume());
    }

    #[test]
    fn routing_after_activation_skips_a_second_resume() {
        let mut coordinator = SceneCoordinator::new();
        let mut host = RecordingHost::with_surface();

        coordinator.became_active(&mut host);
        let link = DeepLink::parse("wikipedia://search?term=Swift").unwrap();
        coordinator.open_url(&link, &mut host);

        let resumed = host
            .events()
            .iter()
            .filter(|event| matches!(event, HostEvent::Resumed))
            .count();
        assert_eq!(resumed, 1);
    }
}

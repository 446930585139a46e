use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::signal::{ShortcutItem, UserActivityRecord};

/// Tab index of the search surface in the host UI.
pub const SEARCH_SURFACE_INDEX: usize = 4;

/// The search surface contract: accept a term, execute a search.
pub trait SearchSurface {
    fn set_term(&mut self, term: &str);
    fn search(&mut self);
}

/// The host UI object the router drives. All methods are called on the
/// single UI-owning thread; implementations never block.
pub trait SurfaceHost {
    fn select_surface(&mut self, index: usize);
    /// The search surface, if it is constructed and attached.
    fn search_surface(&mut self) -> Option<&mut dyn SearchSurface>;
    fn process_activity(&mut self, activity: UserActivityRecord);
    /// Returns whether the shortcut was handled.
    fn process_shortcut(&mut self, item: &ShortcutItem) -> bool;
    fn show_splash(&mut self);
    fn hide_splash(&mut self);
    fn dismiss_splash_and_resume(&mut self);
}

/// One observable host-side effect, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    SurfaceSelected(usize),
    TermDelivered(String),
    SearchExecuted(String),
    ActivityForwarded(UserActivityRecord),
    ShortcutForwarded(String),
    SplashShown,
    SplashHidden,
    Resumed,
}

impl Display for HostEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SurfaceSelected(index) => write!(f, "surface_selected index={index}"),
            Self::TermDelivered(term) => write!(f, "term_delivered term=\"{term}\""),
            Self::SearchExecuted(term) => write!(f, "search_executed term=\"{term}\""),
            Self::ActivityForwarded(activity) => {
                write!(f, "activity_forwarded type=\"{}\"", activity.activity_type)
            }
            Self::ShortcutForwarded(id) => write!(f, "shortcut_forwarded id=\"{id}\""),
            Self::SplashShown => write!(f, "splash_shown"),
            Self::SplashHidden => write!(f, "splash_hidden"),
            Self::Resumed => write!(f, "resumed"),
        }
    }
}

type EventLog = Rc<RefCell<Vec<HostEvent>>>;

/// Deterministic host fixture used by the CLI harness and tests. Records
/// every collaborator call into one ordered log shared with its surface.
/// Single-thread only, like the real host.
pub struct RecordingHost {
    events: EventLog,
    surface: Option<RecordingSurface>,
}

impl RecordingHost {
    /// Host with a constructed, reachable search surface.
    pub fn with_surface() -> Self {
        let events: EventLog = Rc::default();
        let surface = RecordingSurface {
            term: String::new(),
            events: Rc::clone(&events),
        };
        Self {
            events,
            surface: Some(surface),
        }
    }

    /// Host whose search surface cannot be located, for the degradation paths.
    pub fn without_surface() -> Self {
        Self {
            events: Rc::default(),
            surface: None,
        }
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    pub fn surface_term(&self) -> Option<String> {
        self.surface.as_ref().map(|surface| surface.term.clone())
    }

    pub fn forwarded_activities(&self) -> Vec<UserActivityRecord> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::ActivityForwarded(activity) => Some(activity.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn executed_searches(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                HostEvent::SearchExecuted(term) => Some(term.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: HostEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl SurfaceHost for RecordingHost {
    fn select_surface(&mut self, index: usize) {
        self.record(HostEvent::SurfaceSelected(index));
    }

    fn search_surface(&mut self) -> Option<&mut dyn SearchSurface> {
        match self.surface.as_mut() {
            Some(surface) => Some(surface),
            None => None,
        }
    }

    fn process_activity(&mut self, activity: UserActivityRecord) {
        self.record(HostEvent::ActivityForwarded(activity));
    }

    fn process_shortcut(&mut self, item: &ShortcutItem) -> bool {
        self.record(HostEvent::ShortcutForwarded(item.identifier.clone()));
        true
    }

    fn show_splash(&mut self) {
        self.record(HostEvent::SplashShown);
    }

    fn hide_splash(&mut self) {
        self.record(HostEvent::SplashHidden);
    }

    fn dismiss_splash_and_resume(&mut self) {
        self.record(HostEvent::Resumed);
    }
}

pub struct RecordingSurface {
    term: String,
    events: EventLog,
}

impl SearchSurface for RecordingSurface {
    fn set_term(&mut self, term: &str) {
        self.term = term.to_string();
        self.events
            .borrow_mut()
            .push(HostEvent::TermDelivered(term.to_string()));
    }

    fn search(&mut self) {
        self.events
            .borrow_mut()
            .push(HostEvent::SearchExecuted(self.term.clone()));
    }
}

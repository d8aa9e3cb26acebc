use std::fmt;
use std::sync::Arc;

use fuzzy_matcher::skim::SkimMatcherV2;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::AppEvent;
use crate::process::{LoginRequest, SessionRunner};
use crate::ssh_config::{HostEntry, SshConfig};

/// Shown after any failed login probe, whatever the cause.
pub const LOGIN_FAILED: &str = "Login failed: wrong password or SSH error.";

/// Which screen the session is on. Password data only exists on the
/// variants that need it.
#[derive(Clone, PartialEq, Eq)]
pub enum Screen {
    Browse,
    Authenticate {
        host: String,
        password: String,
        error: Option<String>,
    },
    /// Waiting for the one login probe in flight.
    Connecting { request: LoginRequest },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Browse => "browse",
            Screen::Authenticate { .. } => "authenticate",
            Screen::Connecting { .. } => "connecting",
        }
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Browse => f.write_str("Browse"),
            Screen::Authenticate { host, password, error } => f
                .debug_struct("Authenticate")
                .field("host", host)
                .field("password_len", &password.chars().count())
                .field("error", error)
                .finish(),
            Screen::Connecting { request } => f
                .debug_struct("Connecting")
                .field("request", request)
                .finish(),
        }
    }
}

/// Browse-screen filter, as typed after `/`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Filter {
    pub query: String,
    pub editing: bool,
}

impl Filter {
    pub fn is_active(&self) -> bool {
        self.editing || !self.query.is_empty()
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,

    // Browse
    pub hosts: Vec<HostEntry>,
    pub visible_hosts: Vec<usize>, // Indices into `hosts`
    pub host_list_state: ListState,
    pub filter: Filter,
    pub info_panel: String,
    pub show_help: bool,

    // Connecting
    pub spinner_frame: usize,

    pub(super) launch: Option<LoginRequest>,
    pub(super) ssh_config: SshConfig,
    pub(super) runner: Arc<dyn SessionRunner>,
    pub(super) events: UnboundedSender<AppEvent>,
    pub(super) matcher: SkimMatcherV2,
}

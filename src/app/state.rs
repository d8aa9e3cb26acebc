use std::sync::Arc;

use anyhow::{anyhow, Result};
use fuzzy_matcher::skim::SkimMatcherV2;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::types::{Filter, Screen, LOGIN_FAILED};
use crate::app::App;
use crate::event::AppEvent;
use crate::process::{LoginRequest, SessionRunner};
use crate::ssh_config::{HostEntry, SshConfig};

impl App {
    pub fn new(
        ssh_config: SshConfig,
        hosts: Vec<HostEntry>,
        runner: Arc<dyn SessionRunner>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        let mut app = Self {
            screen: Screen::Browse,
            should_quit: false,
            hosts: Vec::new(),
            visible_hosts: Vec::new(),
            host_list_state: ListState::default(),
            filter: Filter::default(),
            info_panel: String::new(),
            show_help: false,
            spinner_frame: 0,
            launch: None,
            ssh_config,
            runner,
            events,
            matcher: SkimMatcherV2::default(),
        };
        app.set_hosts(hosts);
        tracing::info!("Session started with {} hosts", app.hosts.len());
        app
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Resize(_, _) => {}
            AppEvent::Login { success } => self.on_login_result(success),
            AppEvent::InputError(e) => return Err(anyhow!("Failed to read terminal input: {}", e)),
        }
        Ok(())
    }

    fn on_tick(&mut self) {
        if matches!(self.screen, Screen::Connecting { .. }) {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn quit(&mut self) {
        tracing::info!("Quit requested on {} screen", self.screen.name());
        self.should_quit = true;
    }

    /// Browse -> Authenticate for the highlighted host.
    pub fn confirm_selection(&mut self) {
        if !matches!(self.screen, Screen::Browse) {
            return;
        }
        let Some(host) = self.highlighted_host().map(|h| h.name.clone()) else {
            tracing::warn!("Enter pressed but no host selected.");
            return;
        };

        tracing::info!("Selected host {}", host);
        self.screen = Screen::Authenticate {
            host,
            password: String::new(),
            error: None,
        };
    }

    /// Authenticate -> Browse, dropping the typed password.
    pub fn cancel_authentication(&mut self) {
        if let Screen::Authenticate { host, .. } = &self.screen {
            tracing::info!("Password entry for {} cancelled", host);
            self.screen = Screen::Browse;
        }
    }

    /// Authenticate -> Connecting, starting the login probe.
    pub fn submit_password(&mut self) {
        let Screen::Authenticate { host, password, .. } = &mut self.screen else {
            return;
        };

        let request = LoginRequest::new(host.clone(), std::mem::take(password));
        tracing::info!("Starting login probe for {}", request.host);
        self.spinner_frame = 0;
        self.dispatch_probe(request.clone());
        self.screen = Screen::Connecting { request };
    }

    /// Connecting -> done on success, back to Authenticate on failure.
    pub fn on_login_result(&mut self, success: bool) {
        if !matches!(self.screen, Screen::Connecting { .. }) {
            tracing::warn!("Login result arrived outside the connecting screen, ignored");
            return;
        }
        let Screen::Connecting { request } = std::mem::replace(&mut self.screen, Screen::Browse)
        else {
            return;
        };

        if success {
            tracing::info!("Login to {} verified", request.host);
            self.launch = Some(request);
            self.should_quit = true;
        } else {
            tracing::warn!("Login to {} failed", request.host);
            self.screen = Screen::Authenticate {
                host: request.host,
                password: String::new(),
                error: Some(LOGIN_FAILED.to_string()),
            };
        }
    }

    /// The verified login to hand the terminal to, at most once.
    pub fn take_launch(&mut self) -> Option<LoginRequest> {
        self.launch.take()
    }

    fn dispatch_probe(&self, request: LoginRequest) {
        let runner = Arc::clone(&self.runner);
        let events = self.events.clone();

        tokio::task::spawn_blocking(move || {
            let success = runner.probe(&request);
            if events.send(AppEvent::Login { success }).is_err() {
                tracing::warn!("UI loop gone before login result for {}", request.host);
            }
        });
    }
}

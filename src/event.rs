//! The one queue the UI loop reads from.
//!
//! Terminal input comes from a reader thread, login probe results from a
//! blocking task. Both post here; only the UI loop mutates state.

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Emitted when no input arrived within the tick rate.
    Tick,
    /// Result of the single in-flight login probe.
    Login { success: bool },
    /// The terminal can no longer be read.
    InputError(String),
}

pub struct EventHandler {
    sender: UnboundedSender<AppEvent>,
    receiver: UnboundedReceiver<AppEvent>,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));

        let reader = {
            let sender = sender.clone();
            let stop = Arc::clone(&stop);
            thread::spawn(move || read_terminal(sender, stop, tick_rate))
        };

        Self {
            sender,
            receiver,
            stop,
            reader: Some(reader),
        }
    }

    pub fn sender(&self) -> UnboundedSender<AppEvent> {
        self.sender.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.receiver.recv().await
    }
}

// The reader must be gone before anything else reads stdin.
impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                tracing::error!("Terminal reader thread panicked");
            }
        }
    }
}

fn read_terminal(sender: UnboundedSender<AppEvent>, stop: Arc<AtomicBool>, tick_rate: Duration) {
    tracing::debug!("Terminal reader started");
    while !stop.load(Ordering::Relaxed) {
        let event = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                // Release/repeat events only show up on some platforms.
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                Ok(_) => continue,
                Err(e) => AppEvent::InputError(e.to_string()),
            },
            Ok(false) => AppEvent::Tick,
            Err(e) => AppEvent::InputError(e.to_string()),
        };

        let fatal = matches!(event, AppEvent::InputError(_));
        if sender.send(event).is_err() || fatal {
            break;
        }
    }
    tracing::debug!("Terminal reader stopped");
}

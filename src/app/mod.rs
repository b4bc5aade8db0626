//! App module - contains the main application state and logic

pub mod charts;
mod ask;
mod health;
pub(crate) mod session;

use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use eframe::egui;
use session::Session;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Backend configuration (mirrored into settings.json on exit)
    pub(crate) api_base_url: String,
    pub(crate) ask_timeout_secs: u64,

    // Chat session (transient, cleared on user action)
    pub(crate) session: Session,
    pub(crate) input: String,
    pub(crate) focus_input: bool,
    pub(crate) pending_question: Option<String>,
    pub(crate) scroll_to_bottom: bool,

    // In-flight /ask request
    pub(crate) ask_state: Arc<Mutex<AskState>>,
    pub(crate) cancel_token: Option<CancellationToken>,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) http: reqwest::Client,

    // Health probe
    pub(crate) health: HealthStatus,
    pub(crate) startup_probe_done: bool,
    pub(crate) url_dirty: bool,

    // Banners & toast
    pub(crate) last_error: Option<String>,
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    pub(crate) central_panel_rect: Option<egui::Rect>,

    // Sidebar sections
    pub(crate) history_open: bool,

    // Window geometry tracking for save-on-exit
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        Self {
            api_base_url: settings.api_base_url,
            ask_timeout_secs: settings.ask_timeout_secs,
            session: Session::default(),
            input: String::new(),
            focus_input: true,
            pending_question: None,
            scroll_to_bottom: false,
            ask_state: Arc::new(Mutex::new(AskState::default())),
            cancel_token: None,
            runtime: tokio::runtime::Runtime::new().expect("failed to start tokio runtime"),
            http: reqwest::Client::new(),
            health: HealthStatus::Unknown,
            startup_probe_done: false,
            url_dirty: false,
            last_error: None,
            toast_message: None,
            toast_start: None,
            central_panel_rect: None,
            history_open: true,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            api_base_url: self.api_base_url.clone(),
            ask_timeout_secs: self.ask_timeout_secs,
        };
        settings.save(&self.data_dir);
    }

    pub fn is_asking(&self) -> bool {
        matches!(self.ask_state.lock().unwrap().status, AskStatus::Pending)
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(std::time::Instant::now());
    }
}

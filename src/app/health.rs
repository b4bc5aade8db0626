//! Backend health probe
//!
//! Runs on a worker thread with the blocking client; the result lands in
//! egui temp memory and is picked up by the update loop.

use super::App;
use crate::api;
use eframe::egui;
use crate::types::HealthStatus;
use tracing::debug;

const HEALTH_RESULT_KEY: &str = "health_result";

impl App {
    pub fn check_api_health(&mut self, ctx: &egui::Context) {
        if self.health == HealthStatus::Checking {
            return;
        }
        self.health = HealthStatus::Checking;

        let base_url = self.api_base_url.clone();
        let ctx = ctx.clone();
        debug!(base_url = %base_url, "Starting health probe");

        std::thread::spawn(move || {
            let ok = api::check_health(&base_url);
            debug!(healthy = ok, "Health probe finished");
            ctx.memory_mut(|mem| mem.data.insert_temp(HEALTH_RESULT_KEY.into(), ok));
            ctx.request_repaint();
        });
    }

    pub fn poll_health_result(&mut self, ctx: &egui::Context) {
        if let Some(ok) = ctx.memory(|mem| mem.data.get_temp::<bool>(HEALTH_RESULT_KEY.into())) {
            ctx.memory_mut(|mem| mem.data.remove::<bool>(HEALTH_RESULT_KEY.into()));
            self.health = if ok {
                HealthStatus::Connected
            } else {
                HealthStatus::Unavailable
            };
        }
    }
}

//! /ask request logic
//!
//! One question in flight at a time. The request runs on the app-owned tokio
//! runtime; the UI thread polls the shared state each frame and folds the
//! outcome into the session.

use super::App;
use crate::api;
use crate::types::*;
use eframe::egui;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

fn spawn_ask(
    question: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
    state: Arc<Mutex<AskState>>,
    token: CancellationToken,
    ctx: egui::Context,
    runtime: &tokio::runtime::Runtime,
) {
    runtime.spawn(async move {
        let outcome = tokio::select! {
            _ = token.cancelled() => AskStatus::Cancelled,
            result = api::ask(&client, &base_url, &question, timeout) => match result {
                Ok(response) => AskStatus::Done(response),
                Err(e) => AskStatus::Failed(e.to_string()),
            },
        };
        state.lock().unwrap().status = outcome;
        ctx.request_repaint();
    });
}

impl App {
    /// Kick off a question. The user message is appended immediately; the
    /// answer (or a banner) arrives via `poll_ask_result`.
    pub fn submit_question(&mut self, ctx: &egui::Context, question: String) {
        let question = question.trim().to_string();
        if question.is_empty() || self.is_asking() {
            return;
        }

        info!(question = %question, timeout_secs = self.ask_timeout_secs, "Submitting question");

        self.last_error = None;
        self.session.push_user(&question);
        self.scroll_to_bottom = true;

        let token = CancellationToken::new();
        self.cancel_token = Some(token.clone());
        {
            let mut s = self.ask_state.lock().unwrap();
            s.status = AskStatus::Pending;
            s.question = question.clone();
            s.started = Some(std::time::Instant::now());
        }

        spawn_ask(
            question,
            self.api_base_url.clone(),
            Duration::from_secs(self.ask_timeout_secs),
            self.http.clone(),
            self.ask_state.clone(),
            token,
            ctx.clone(),
            &self.runtime,
        );
    }

    pub fn cancel_ask(&mut self) {
        if let Some(token) = &self.cancel_token {
            info!("Cancelling in-flight question");
            token.cancel();
        }
    }

    /// Fold a finished request into the session. Failures become banners and
    /// never touch the transcript.
    pub fn poll_ask_result(&mut self) {
        let finished = {
            let mut s = self.ask_state.lock().unwrap();
            match &s.status {
                AskStatus::Pending | AskStatus::Idle => None,
                other => {
                    let taken = other.clone();
                    s.status = AskStatus::Idle;
                    Some((taken, s.question.clone()))
                }
            }
        };

        let Some((status, question)) = finished else {
            return;
        };
        self.cancel_token = None;

        match status {
            AskStatus::Done(response) => {
                info!(
                    rows = response.row_count,
                    execution_time_ms = response.execution_time_ms,
                    "Question answered"
                );
                self.session.apply_success(&question, &response);
                self.scroll_to_bottom = true;
            }
            AskStatus::Failed(message) => {
                warn!(error = %message, "Question failed");
                self.last_error = Some(message);
            }
            AskStatus::Cancelled => {
                info!("Question cancelled");
                self.last_error = Some("Request cancelled.".to_string());
            }
            AskStatus::Idle | AskStatus::Pending => unreachable!(),
        }
        self.focus_input = true;
    }
}

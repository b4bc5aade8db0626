#![windows_subsystem = "windows"]
//! Lab Intel Chat - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod api;
mod app;
mod constants;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use tracing::info;
use types::*;
use ui::components;
use utils::{export_file_name, get_data_dir, rows_to_csv};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "lab-intel-chat.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lab_intel_chat=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Lab Intel Chat starting");

    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1200.0, 780.0)))
        .with_min_inner_size([900.0, 600.0])
        .with_title("Lab Intel Chat");

    let needs_center = win_pos.is_none();
    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Lab Intel Chat",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Probe the backend once at startup
        if !self.startup_probe_done {
            self.startup_probe_done = true;
            self.check_api_health(ctx);
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Collect results from background work
        self.poll_health_result(ctx);
        self.poll_ask_result();

        // A quick query or history click from last frame
        if let Some(question) = self.pending_question.take() {
            self.submit_question(ctx, question);
        }

        self.render_sidebar(ctx);
        self.render_chat_panel(ctx);
        self.render_toast(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.cancel_ask();
        self.save_settings();
    }
}

// ============================================================================
// SIDEBAR
// ============================================================================

impl App {
    fn render_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("config_panel")
            .exact_width(theme::SIDEBAR_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(
                egui::Frame::new().fill(theme::BG_BASE).inner_margin(egui::Margin {
                    left: 16,
                    right: 16,
                    top: 0,
                    bottom: 0,
                }),
            )
            .show(ctx, |ui| {
                let panel_rect = ui.max_rect();

                ui.add_space(21.0);
                ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(egui_phosphor::regular::FLASK)
                                .size(28.0)
                                .color(theme::ACCENT),
                        )
                        .selectable(false),
                    );
                    ui.add_space(4.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("LAB INTEL CHAT")
                                .size(11.0)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                });
                ui.add_space(11.0);

                self.render_connection_section(ctx, ui);
                ui.add_space(theme::SPACING_SM);
                self.render_quick_query_section(ui);
                ui.add_space(theme::SPACING_SM);
                self.render_history_section(ui);

                // Clear Chat pinned at the bottom
                let bottom_height = 36.0 + 14.0 + 12.0;
                let bottom_rect = egui::Rect::from_min_max(
                    egui::pos2(panel_rect.left() + 16.0, panel_rect.bottom() - bottom_height),
                    egui::pos2(panel_rect.right() - 16.0, panel_rect.bottom()),
                );
                ui.allocate_ui_at_rect(bottom_rect, |ui| {
                    ui.set_min_width(bottom_rect.width());
                    let enabled = !self.session.is_empty();
                    let clear_text =
                        format!("{}  Clear Chat History", egui_phosphor::regular::TRASH);
                    let clear_btn = ui.add_enabled(
                        enabled,
                        theme::button_danger(clear_text).min_size(egui::vec2(
                            ui.available_width(),
                            32.0,
                        )),
                    );
                    if clear_btn.clicked() {
                        self.session.clear();
                        self.last_error = None;
                    }

                    ui.add_space(4.0);
                    ui.vertical_centered(|ui| {
                        ui.horizontal(|ui| {
                            ui.add_space(ui.available_width() / 2.0 - 30.0);
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(format!("v{}", APP_VERSION))
                                        .size(10.0)
                                        .color(theme::TEXT_DIM),
                                )
                                .selectable(false),
                            );
                            let folder = ui
                                .add(
                                    egui::Label::new(
                                        egui::RichText::new(egui_phosphor::regular::FOLDER_OPEN)
                                            .size(11.0)
                                            .color(theme::TEXT_DIM),
                                    )
                                    .selectable(false)
                                    .sense(egui::Sense::click()),
                                )
                                .on_hover_text("Open settings & logs folder");
                            if folder.clicked() {
                                if let Err(e) = open::that(&self.data_dir) {
                                    tracing::warn!(error = %e, "Failed to open data folder");
                                }
                            }
                        });
                    });
                });
            });
    }

    fn render_connection_section(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        theme::section_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("CONNECTION")
                            .color(theme::TEXT_DIM)
                            .size(11.0),
                    )
                    .selectable(false),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (rect, response) =
                        ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::click());
                    let color = if response.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        theme::TEXT_PRIMARY
                    } else {
                        theme::TEXT_DIM
                    };
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        egui_phosphor::regular::ARROWS_CLOCKWISE,
                        egui::FontId::proportional(14.0),
                        color,
                    );
                    let response = response.on_hover_text("Re-check backend health");
                    if response.clicked() {
                        self.check_api_health(ctx);
                    }
                });
            });
            ui.add_space(6.0);

            match self.health {
                HealthStatus::Connected => components::health_row(
                    ui,
                    egui_phosphor::regular::CHECK_CIRCLE,
                    "API Connected",
                    theme::STATUS_SUCCESS,
                ),
                HealthStatus::Unavailable => {
                    components::health_row(
                        ui,
                        egui_phosphor::regular::X_CIRCLE,
                        "API Not Available",
                        theme::STATUS_ERROR,
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(format!(
                                "Ensure the backend is running at {}",
                                self.api_base_url
                            ))
                            .size(10.0)
                            .color(theme::STATUS_WARNING),
                        )
                        .wrap(),
                    );
                }
                HealthStatus::Checking => components::health_row(
                    ui,
                    egui_phosphor::regular::CIRCLE_NOTCH,
                    "Checking...",
                    theme::TEXT_MUTED,
                ),
                HealthStatus::Unknown => components::health_row(
                    ui,
                    egui_phosphor::regular::CIRCLE,
                    "Not checked",
                    theme::TEXT_DIM,
                ),
            }

            ui.add_space(theme::SPACING_MD);

            ui.add(
                egui::Label::new(
                    egui::RichText::new("API Base URL")
                        .size(11.0)
                        .color(theme::TEXT_MUTED),
                )
                .selectable(false),
            );
            let url_edit = egui::Frame::new()
                .fill(theme::BG_INPUT)
                .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE))
                .corner_radius(theme::RADIUS_DEFAULT)
                .inner_margin(egui::Margin::symmetric(6, 4))
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.api_base_url)
                            .frame(false)
                            .desired_width(ui.available_width())
                            .font(egui::FontId::proportional(12.0)),
                    )
                })
                .inner;
            // changed() is only true on typing frames, lost_focus() only on the
            // commit frame, so an edit is remembered until focus leaves.
            if url_edit.changed() {
                self.url_dirty = true;
            }
            if url_edit.lost_focus() && self.url_dirty {
                self.url_dirty = false;
                self.check_api_health(ctx);
            }

            ui.add_space(theme::SPACING_MD);

            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Ask Timeout")
                            .size(11.0)
                            .color(theme::TEXT_MUTED),
                    )
                    .selectable(false),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(format!("{}s", self.ask_timeout_secs))
                                .size(11.0)
                                .color(theme::TEXT_PRIMARY),
                        )
                        .selectable(false),
                    );
                });
            });
            theme::value_slider(
                ui,
                &mut self.ask_timeout_secs,
                ASK_TIMEOUT_MIN_SECS,
                ASK_TIMEOUT_MAX_SECS,
            );
        });
    }

    fn render_quick_query_section(&mut self, ui: &mut egui::Ui) {
        theme::section_frame().show(ui, |ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new("QUICK QUERIES")
                        .color(theme::TEXT_DIM)
                        .size(11.0),
                )
                .selectable(false),
            );
            ui.add_space(6.0);

            let busy = self.is_asking();
            for &query in QUICK_QUERIES {
                let (rect, response) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), 30.0),
                    egui::Sense::click(),
                );
                if response.hovered() && !busy {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if ui.is_rect_visible(rect) {
                    let fill = if busy {
                        theme::BTN_DISABLED
                    } else {
                        let (fill, _) =
                            theme::button_visual(&response, theme::BG_SURFACE, rect);
                        fill
                    };
                    ui.painter().rect_filled(rect, theme::RADIUS_DEFAULT, fill);
                    let galley = ui.painter().layout(
                        query.to_string(),
                        egui::FontId::proportional(11.0),
                        if busy {
                            theme::TEXT_DIM
                        } else {
                            theme::TEXT_SECONDARY
                        },
                        rect.width() - 16.0,
                    );
                    let text_pos = egui::pos2(
                        rect.left() + 8.0,
                        rect.center().y - galley.size().y / 2.0,
                    );
                    ui.painter().galley(text_pos, galley, theme::TEXT_SECONDARY);
                }
                if response.clicked() && !busy {
                    self.pending_question = Some(query.to_string());
                }
                ui.add_space(2.0);
            }
        });
    }

    fn render_history_section(&mut self, ui: &mut egui::Ui) {
        theme::section_frame().show(ui, |ui| {
            let label = format!("RECENT QUESTIONS ({})", self.session.history.len());
            if components::expander_row(
                ui,
                self.history_open,
                egui_phosphor::regular::CLOCK_COUNTER_CLOCKWISE,
                &label,
            ) {
                self.history_open = !self.history_open;
            }

            if !self.history_open {
                return;
            }
            if self.session.history.is_empty() {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Nothing asked yet")
                            .size(11.0)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
                return;
            }

            let mut clicked_question: Option<String> = None;
            egui::ScrollArea::vertical()
                .max_height(140.0)
                .id_salt("history_scroll")
                .show(ui, |ui| {
                    for entry in self.session.history.iter().rev() {
                        let (rect, response) = ui.allocate_exact_size(
                            egui::vec2(ui.available_width(), 22.0),
                            egui::Sense::click(),
                        );
                        if response.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            ui.painter().rect_filled(
                                rect,
                                theme::RADIUS_DEFAULT,
                                theme::BG_HOVER,
                            );
                        }
                        ui.painter().text(
                            egui::pos2(rect.left() + 4.0, rect.center().y),
                            egui::Align2::LEFT_CENTER,
                            entry.timestamp.format("%H:%M").to_string(),
                            egui::FontId::proportional(10.0),
                            theme::TEXT_DIM,
                        );
                        let galley = ui.painter().layout_no_wrap(
                            entry.question.clone(),
                            egui::FontId::proportional(11.0),
                            theme::TEXT_SECONDARY,
                        );
                        let text_left = rect.left() + 42.0;
                        let clip = ui.painter().with_clip_rect(egui::Rect::from_min_max(
                            egui::pos2(text_left, rect.top()),
                            rect.max,
                        ));
                        clip.galley(
                            egui::pos2(text_left, rect.center().y - galley.size().y / 2.0),
                            galley,
                            theme::TEXT_SECONDARY,
                        );

                        let response = if entry.sql.is_empty() {
                            response
                        } else {
                            response.on_hover_text(
                                egui::RichText::new(&entry.sql).monospace().size(10.0),
                            )
                        };
                        if response.clicked() {
                            clicked_question = Some(entry.question.clone());
                        }
                    }
                });
            if let Some(question) = clicked_question {
                self.input = question;
                self.focus_input = true;
            }
        });
    }
}

// ============================================================================
// CHAT PANEL
// ============================================================================

impl App {
    fn render_chat_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(20, 12)),
            )
            .show(ctx, |ui| {
                self.central_panel_rect = Some(ui.max_rect());

                // Reserve the bottom strip: optional banner + input row
                let mut bottom_height = theme::INPUT_ROW_HEIGHT + 8.0;
                if self.last_error.is_some() {
                    bottom_height += 48.0;
                }
                let transcript_height = ui.available_height() - bottom_height;

                egui::ScrollArea::vertical()
                    .id_salt("transcript")
                    .max_height(transcript_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if self.session.is_empty() {
                            self.render_empty_state(ui);
                        }
                        for idx in 0..self.session.messages.len() {
                            ui.push_id(idx, |ui| {
                                self.render_message(ui, idx);
                            });
                            ui.add_space(theme::SPACING_MD);
                        }
                        self.render_in_flight_row(ui);
                        if self.scroll_to_bottom {
                            self.scroll_to_bottom = false;
                            ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                        }
                    });

                ui.add_space(theme::SPACING_MD);

                if let Some(error) = self.last_error.clone() {
                    if components::error_banner(ui, &error) {
                        self.last_error = None;
                    }
                    ui.add_space(theme::SPACING_SM);
                }

                self.render_input_row(ctx, ui);
            });
    }

    fn render_empty_state(&self, ui: &mut egui::Ui) {
        ui.add_space(60.0);
        ui.vertical_centered(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(egui_phosphor::regular::CHAT_CIRCLE_TEXT)
                        .size(42.0)
                        .color(theme::BORDER_DEFAULT),
                )
                .selectable(false),
            );
            ui.add_space(8.0);
            ui.add(
                egui::Label::new(
                    egui::RichText::new("Ask questions about lab data in natural language")
                        .size(14.0)
                        .color(theme::TEXT_MUTED),
                )
                .selectable(false),
            );
            ui.add(
                egui::Label::new(
                    egui::RichText::new("Answers arrive with the SQL, the rows, and charts")
                        .size(12.0)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
        });
    }

    fn render_in_flight_row(&mut self, ui: &mut egui::Ui) {
        if !self.is_asking() {
            return;
        }
        let elapsed = self
            .ask_state
            .lock()
            .unwrap()
            .started
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0);

        theme::message_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.spinner();
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(
                            "Analyzing your question and querying the database...",
                        )
                        .color(theme::TEXT_MUTED),
                    )
                    .selectable(false),
                );
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(format!("{}s", elapsed))
                            .size(11.0)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let cancel_btn = ui.add(theme::button_danger(format!(
                        "{}  Cancel",
                        egui_phosphor::regular::X
                    )));
                    if cancel_btn.clicked() {
                        self.cancel_ask();
                    }
                });
            });
        });
        // Keep the elapsed counter moving
        ui.ctx().request_repaint_after(std::time::Duration::from_millis(250));
    }

    fn render_message(&mut self, ui: &mut egui::Ui, idx: usize) {
        let role = self.session.messages[idx].role;
        theme::message_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());

            let (icon, name, color) = components::role_badge(role);
            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(egui::RichText::new(icon).size(14.0).color(color))
                        .selectable(false),
                );
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(name).size(11.0).strong().color(color),
                    )
                    .selectable(false),
                );
            });
            ui.add_space(2.0);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(&self.session.messages[idx].content).size(14.0),
                )
                .wrap()
                .selectable(true),
            );

            if role == ChatRole::Assistant {
                self.render_answer_details(ui, idx);
            }
        });
    }

    fn render_answer_details(&mut self, ui: &mut egui::Ui, idx: usize) {
        // SQL expander
        if !self.session.messages[idx].sql_query.is_empty() {
            ui.add_space(theme::SPACING_SM);
            let open = self.session.messages[idx].sql_open;
            if components::expander_row(ui, open, egui_phosphor::regular::CODE, "View SQL Query")
            {
                self.session.messages[idx].sql_open = !open;
            }
            if self.session.messages[idx].sql_open {
                let sql = self.session.messages[idx].sql_query.clone();
                components::sql_block(ui, &sql);
            }
        }

        if self.session.messages[idx].rows.is_empty() {
            ui.add_space(theme::SPACING_SM);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(format!(
                        "{}  No data returned from query.",
                        egui_phosphor::regular::INFO
                    ))
                    .size(12.0)
                    .color(theme::TEXT_MUTED),
                )
                .selectable(false),
            );
            return;
        }

        // Metric chips
        ui.add_space(theme::SPACING_SM);
        let (n_rows, n_cols, exec_ms) = {
            let msg = &self.session.messages[idx];
            (msg.rows.len(), msg.columns().len(), msg.execution_time_ms)
        };
        ui.horizontal(|ui| {
            components::metric_chip(ui, "ROWS RETURNED", &n_rows.to_string());
            components::metric_chip(ui, "COLUMNS", &n_cols.to_string());
            components::metric_chip(ui, "EXECUTION TIME", &utils::format_duration_ms(exec_ms));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let export_btn = ui.add(theme::button(format!(
                    "{}  Download CSV",
                    egui_phosphor::regular::DOWNLOAD_SIMPLE
                )));
                if export_btn.clicked() {
                    self.export_csv(idx);
                }
            });
        });

        ui.add_space(theme::SPACING_SM);
        self.render_result_table(ui, idx);

        // Auto-charts
        let chart_set = app::charts::detect(&self.session.messages[idx].rows);
        if !chart_set.is_empty() {
            ui.add_space(theme::SPACING_SM);
            let open = self.session.messages[idx].charts_open;
            if components::expander_row(
                ui,
                open,
                egui_phosphor::regular::CHART_BAR,
                "Visualizations",
            ) {
                self.session.messages[idx].charts_open = !open;
            }
            if self.session.messages[idx].charts_open {
                if let Some(trend) = &chart_set.trend {
                    ui::charts::trend_chart(ui, trend);
                    ui.add_space(theme::SPACING_SM);
                }
                for bar in &chart_set.bars {
                    ui::charts::bar_chart(ui, bar);
                    ui.add_space(theme::SPACING_SM);
                }
            }
        }
    }

    fn render_result_table(&mut self, ui: &mut egui::Ui, idx: usize) {
        use egui_extras::{Column, TableBuilder};

        let msg = &self.session.messages[idx];
        let columns: Vec<String> = msg.columns().iter().map(|c| c.to_string()).collect();
        if columns.is_empty() {
            return;
        }
        let n_rows = msg.rows.len();

        let available_width = ui.available_width();
        let col_width = (available_width / columns.len() as f32).max(80.0);

        let mut table = TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0)
            .max_scroll_height(theme::TABLE_MAX_HEIGHT)
            .vscroll(n_rows as f32 * theme::TABLE_ROW_HEIGHT > theme::TABLE_MAX_HEIGHT);

        for _ in &columns {
            table = table.column(Column::exact(col_width).clip(true));
        }

        table
            .header(28.0, |mut header| {
                for col in &columns {
                    header.col(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(col.to_uppercase())
                                    .size(11.0)
                                    .strong()
                                    .color(theme::TEXT_MUTED),
                            )
                            .truncate()
                            .selectable(false),
                        );
                    });
                }
            })
            .body(|body| {
                let rows = &self.session.messages[idx].rows;
                body.rows(theme::TABLE_ROW_HEIGHT, n_rows, |mut row| {
                    let row_idx = row.index();
                    for col in &columns {
                        row.col(|ui| {
                            let text = rows[row_idx]
                                .get(col)
                                .map(utils::display_value)
                                .unwrap_or_default();
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(text)
                                        .size(12.0)
                                        .color(theme::TEXT_SECONDARY),
                                )
                                .truncate()
                                .selectable(true),
                            );
                        });
                    }
                });
            });
    }

    fn render_input_row(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let busy = self.is_asking();

        ui.horizontal(|ui| {
            let send_width = 90.0;
            let input_width = ui.available_width() - send_width - 8.0;

            let edit = egui::Frame::new()
                .fill(theme::BG_INPUT)
                .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE))
                .corner_radius(theme::RADIUS_DEFAULT)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut self.input)
                            .hint_text("Ask a question about lab data...")
                            .frame(false)
                            .desired_width(input_width - 22.0),
                    )
                })
                .inner;

            if self.focus_input && !busy {
                self.focus_input = false;
                edit.request_focus();
            }

            let submitted =
                edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let can_send = !busy && !self.input.trim().is_empty();
            let send_btn = ui.add_enabled(
                can_send,
                theme::button_accent(format!(
                    "{}  Send",
                    egui_phosphor::regular::PAPER_PLANE_RIGHT
                ))
                .min_size(egui::vec2(send_width, 34.0)),
            );

            if (submitted || send_btn.clicked()) && can_send {
                let question = std::mem::take(&mut self.input);
                self.submit_question(ctx, question);
            }
        });
    }

    fn export_csv(&mut self, idx: usize) {
        let msg = &self.session.messages[idx];
        let csv = rows_to_csv(&msg.rows);
        let n_rows = msg.rows.len();

        let Some(path) = rfd::FileDialog::new()
            .set_file_name(export_file_name())
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, csv) {
            Ok(()) => {
                info!(path = %path.display(), rows = n_rows, "Exported result set");
                self.show_toast(format!(
                    "Exported {} rows to {}",
                    n_rows,
                    path.file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default()
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, "CSV export failed");
                self.last_error = Some(format!("Export failed: {}", e));
            }
        }
    }

    // Toast notification (bottom-right of central panel, 3s visible then fade, pause on hover)
    fn render_toast(&mut self, ctx: &egui::Context) {
        let (Some(msg), Some(panel_rect)) = (self.toast_message.clone(), self.central_panel_rect)
        else {
            return;
        };
        let visible_duration = 3.0;
        let fade_duration = 0.5;
        let total_duration = visible_duration + fade_duration;
        let margin = 12.0;

        let toast_pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin);

        let response = egui::Area::new(egui::Id::new("export_toast"))
            .fixed_pos(toast_pos)
            .pivot(egui::Align2::RIGHT_BOTTOM)
            .show(ctx, |ui| {
                let elapsed = self
                    .toast_start
                    .map(|t| t.elapsed().as_secs_f32())
                    .unwrap_or(0.0);
                let alpha = if elapsed > visible_duration {
                    (total_duration - elapsed) / fade_duration
                } else {
                    1.0
                };

                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(
                        0x1a,
                        0x1a,
                        0x1e,
                        (230.0 * alpha) as u8,
                    ))
                    .stroke(egui::Stroke::new(
                        1.0,
                        egui::Color32::from_rgba_unmultiplied(
                            theme::ACCENT.r(),
                            theme::ACCENT.g(),
                            theme::ACCENT.b(),
                            (100.0 * alpha) as u8,
                        ),
                    ))
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(16, 10))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&msg).color(
                            egui::Color32::from_rgba_unmultiplied(
                                255,
                                255,
                                255,
                                (255.0 * alpha) as u8,
                            ),
                        ));
                    });
            });

        // Pause timer while hovering
        if response.response.hovered() {
            self.toast_start = Some(std::time::Instant::now());
        }

        let elapsed = self
            .toast_start
            .map(|t| t.elapsed().as_secs_f32())
            .unwrap_or(0.0);
        if elapsed >= total_duration {
            self.toast_message = None;
            self.toast_start = None;
        } else {
            ctx.request_repaint();
        }
    }
}

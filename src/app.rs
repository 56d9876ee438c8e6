use crate::config::FormConfig;
use crate::debug::workflow::{DebugDispatcher, DebugWorkflow, Notice, SubmitOutcome};
use crate::event::AppEvent;
use crate::theme::Theme;
use crate::ui::code_editor::CodeEditor;
use crate::ui::results::render_results;
use eframe::egui::{self, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const PROCESSING_POLL: Duration = Duration::from_millis(100);

pub struct StackOverFixApp<D: DebugDispatcher> {
    rx: Receiver<AppEvent>,
    dispatcher: D,
    workflow: DebugWorkflow,
    form_config: FormConfig,
    service_url: String,
    theme: Theme,
    theme_applied: bool,
    diagnostics_log: Vec<String>,
}

impl<D: DebugDispatcher> StackOverFixApp<D> {
    pub fn new(
        rx: Receiver<AppEvent>,
        dispatcher: D,
        form_config: FormConfig,
        service_url: String,
    ) -> Self {
        Self {
            rx,
            dispatcher,
            workflow: DebugWorkflow::new(form_config.default_prompt.clone()),
            form_config,
            service_url,
            theme: Theme::default(),
            theme_applied: false,
            diagnostics_log: Vec::new(),
        }
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn submit(&mut self, ctx: &egui::Context) {
        match self.workflow.submit(&self.dispatcher) {
            SubmitOutcome::Dispatched(session) => {
                self.log_diagnostic(format!("session {session}: analyze_error sent"));
            }
            SubmitOutcome::Rejected => {
                self.log_diagnostic("stack trace rejected: not valid JSON");
            }
            SubmitOutcome::Ignored => {}
        }
        ctx.request_repaint();
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event, ctx),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent, ctx: &egui::Context) {
        match event {
            AppEvent::DebugCompleted {
                session,
                normalized,
            } => {
                let issues: Vec<String> =
                    normalized.issues.iter().map(ToString::to_string).collect();
                let documents = normalized.result.documentation_results.len();
                if self.workflow.complete(session, normalized) {
                    self.log_diagnostic(format!(
                        "session {session}: completed with {documents} documentation link(s)"
                    ));
                    for issue in issues {
                        self.log_diagnostic(format!("response schema: {issue}"));
                    }
                } else {
                    self.log_diagnostic(format!("session {session}: stale completion dropped"));
                }
            }
            AppEvent::DebugFailed { session, message } => {
                if self.workflow.fail(session) {
                    self.log_diagnostic(format!("session {session}: {message}"));
                } else {
                    self.log_diagnostic(format!("session {session}: stale failure dropped"));
                }
            }
            AppEvent::Warning(message) => {
                self.log_diagnostic(message);
            }
        }
        ctx.request_repaint();
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("StackOverFix");
                ui.separator();
                ui.label(RichText::new(&self.service_url).color(self.theme.text_muted));
                ui.separator();
                let (status, color) = if self.workflow.is_processing() {
                    ("Processing", self.theme.warning)
                } else {
                    ("Idle", self.theme.success)
                };
                ui.label(RichText::new(status).color(color));
            });
        });
    }

    fn render_diagnostics(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("diagnostics_panel").show(ctx, |ui| {
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(120.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.diagnostics_log {
                                ui.label(RichText::new(entry).monospace().size(12.0));
                            }
                        });
                });
        });
    }

    fn section_title(&self, ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(18.0).color(self.theme.text_primary));
        ui.add_space(self.theme.spacing_4);
    }

    fn render_form(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let processing = self.workflow.is_processing();
        let theme = self.theme.clone();

        theme.card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.columns(2, |columns| {
                self.section_title(&mut columns[0], "Stack Trace");
                columns[0].add(
                    CodeEditor::new(&mut self.workflow.form.stack_trace)
                        .hint_text("Paste your full error stack trace here (JSON)...")
                        .min_height(self.form_config.stack_trace_min_height)
                        .enabled(!processing),
                );

                self.section_title(&mut columns[1], "Code Snippet");
                columns[1].add(
                    CodeEditor::new(&mut self.workflow.form.code_snippet)
                        .hint_text("Paste the relevant code snippet here...")
                        .min_height(self.form_config.code_snippet_min_height)
                        .enabled(!processing),
                );
            });

            ui.add_space(theme.spacing_16);
            self.section_title(ui, "Optional Prompt");
            ui.add(
                CodeEditor::new(&mut self.workflow.form.prompt)
                    .hint_text(
                        "e.g. Can you explain why this error occurs and suggest best practices?",
                    )
                    .min_height(self.form_config.prompt_min_height)
                    .enabled(!processing),
            );

            ui.add_space(theme.spacing_16);
            let label = if processing {
                "Processing..."
            } else {
                "Fix My Code"
            };
            let clicked = ui
                .horizontal(|ui| {
                    if processing {
                        ui.spinner();
                    }
                    ui.add_enabled(
                        self.workflow.can_submit(),
                        theme
                            .primary_button(label)
                            .min_size(egui::vec2(ui.available_width(), theme.button_height)),
                    )
                    .clicked()
                })
                .inner;

            if clicked {
                self.submit(ctx);
            }
        });
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.workflow.notice() else {
            return;
        };
        let accent = match notice {
            Notice::InvalidStackTrace => self.theme.warning,
            Notice::RequestFailed => self.theme.danger,
        };

        let modal = egui::Modal::new(egui::Id::new("workflow_notice")).show(ctx, |ui| {
            ui.set_width(320.0);
            ui.label(RichText::new(notice.title()).strong().color(accent));
            ui.add_space(self.theme.spacing_8);
            ui.label(notice.message());
            ui.add_space(self.theme.spacing_12);
            ui.button("OK").clicked()
        });

        if modal.inner || modal.should_close() {
            self.workflow.dismiss_notice();
        }
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .id_salt("main_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("StackOverFix")
                                .size(40.0)
                                .strong()
                                .color(self.theme.accent_light),
                        );
                        ui.label(
                            RichText::new(
                                "Paste your Python error stack trace and code snippet to get an AI-powered fix.",
                            )
                            .color(self.theme.text_muted),
                        );
                    });
                    ui.add_space(self.theme.spacing_24);

                    self.render_form(ui, ctx);

                    if let Some(result) = self.workflow.visible_result() {
                        ui.add_space(self.theme.spacing_24);
                        render_results(ui, &self.theme, result);
                    }
                });
        });
    }
}

impl<D: DebugDispatcher> eframe::App for StackOverFixApp<D> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            self.theme.apply_visuals(ctx);
            self.theme_applied = true;
        }

        self.drain_events(ctx);
        self.render_top_bar(ctx);
        self.render_diagnostics(ctx);
        self.render_center_panel(ctx);
        self.render_notice(ctx);

        if self.workflow.is_processing() {
            ctx.request_repaint_after(PROCESSING_POLL);
        }
    }
}

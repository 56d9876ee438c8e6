use crate::debug::{DebugResult, DisplayResult};
use crate::theme::Theme;
use eframe::egui::{self, RichText, Ui};

fn step_heading(ui: &mut Ui, theme: &Theme, number: u8, title: &str) {
    ui.horizontal(|ui| {
        egui::Frame::new()
            .fill(theme.accent_primary.gamma_multiply(0.15))
            .corner_radius(egui::CornerRadius::same(theme.radius_12))
            .inner_margin(egui::Margin::symmetric(theme.spacing_8 as i8, theme.spacing_4 as i8))
            .show(ui, |ui| {
                ui.label(RichText::new(number.to_string()).color(theme.accent_light).strong());
            });
        ui.label(RichText::new(title).color(theme.text_primary).size(17.0));
    });
    ui.add_space(theme.spacing_8);
}

fn code_block(ui: &mut Ui, theme: &Theme, code: &str, language: &str) {
    theme.code_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(language).color(theme.text_muted).size(12.0));
        ui.add_space(theme.spacing_4);
        let shown = if code.is_empty() { " " } else { code };
        ui.label(
            RichText::new(shown)
                .color(theme.text_primary)
                .size(13.0)
                .monospace(),
        );
    });
}

fn render_relevance(ui: &mut Ui, theme: &Theme, result: &DebugResult) {
    step_heading(ui, theme, 1, "Documentation Relevance Check");
    let accent = if result.requires_documentation {
        theme.accent_primary
    } else {
        theme.text_muted
    };
    theme.callout_frame(accent).show(ui, |ui| {
        ui.set_width(ui.available_width());
        let title = if result.requires_documentation {
            "Documentation retrieval required"
        } else {
            "Documentation retrieval not required"
        };
        ui.label(RichText::new(title).strong());

        let phrase = result.search_phrase.as_deref().unwrap_or_default();
        if result.requires_documentation && !phrase.is_empty() {
            ui.add_space(theme.spacing_4);
            ui.label("Search phrase generated:");
            ui.label(
                RichText::new(format!("\"{phrase}\""))
                    .italics()
                    .color(theme.accent_light),
            );
        }
    });
}

fn render_documentation(ui: &mut Ui, theme: &Theme, result: &DebugResult) {
    step_heading(ui, theme, 2, "Vector Search Results");
    for entry in &result.documentation_results {
        theme.section_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(&entry.title).strong());
            if entry.content.starts_with("http://") || entry.content.starts_with("https://") {
                ui.hyperlink(&entry.content);
            } else {
                ui.label(RichText::new(&entry.content).color(theme.text_muted));
            }
        });
    }
}

fn render_correction(ui: &mut Ui, theme: &Theme, display: &DisplayResult<'_>) {
    let result = display.result;
    step_heading(
        ui,
        theme,
        display.step_number_for_correction(),
        "AI-Powered Error Correction",
    );

    if let (true, Some(useful)) = (
        result.requires_documentation,
        result.documentation_was_useful,
    ) {
        let (accent, title, detail) = if useful {
            (
                theme.success,
                "Documentation was helpful",
                "The retrieved documentation was used to generate a better solution.",
            )
        } else {
            (
                theme.danger,
                "Documentation was not helpful",
                "A direct fix was generated without using the documentation.",
            )
        };
        theme.callout_frame(accent).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).strong().color(accent));
            ui.label(RichText::new(detail).color(theme.text_muted));
        });
        ui.add_space(theme.spacing_8);
    }

    theme.section_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new("Root Cause Explanation").strong().color(theme.warning));
        ui.add_space(theme.spacing_4);
        ui.label(&display.explanation);
    });

    ui.add_space(theme.spacing_8);
    ui.label(RichText::new("Fixed Code").strong());
    let language = display.language.as_deref().unwrap_or("python");
    code_block(ui, theme, &display.fixed_code, language);

    if !display.trailing_note.is_empty() {
        ui.add_space(theme.spacing_8);
        ui.label(RichText::new(&display.trailing_note).color(theme.text_muted));
    }

    if let Some(alternatives) = result
        .alternative_solutions
        .as_ref()
        .filter(|alternatives| !alternatives.is_empty())
    {
        ui.add_space(theme.spacing_8);
        ui.label(RichText::new("Alternative Solutions").strong());
        for (index, solution) in alternatives.iter().enumerate() {
            ui.label(
                RichText::new(format!("Alternative {}:", index + 1))
                    .color(theme.text_muted)
                    .size(12.0),
            );
            code_block(ui, theme, solution, language);
        }
    }
}

pub fn render_results(ui: &mut Ui, theme: &Theme, result: &DebugResult) {
    let display = DisplayResult::from_result(result);

    theme.card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.heading("Debugging Results");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (badge, color) = if result.requires_documentation {
                    ("Documentation Required", theme.accent_light)
                } else {
                    ("Direct Fix", theme.text_muted)
                };
                ui.label(RichText::new(badge).color(color).strong());
            });
        });
        ui.separator();
        ui.add_space(theme.spacing_8);

        render_relevance(ui, theme, result);
        ui.add_space(theme.spacing_16);

        if result.requires_documentation {
            render_documentation(ui, theme, result);
            ui.add_space(theme.spacing_16);
        }

        render_correction(ui, theme, &display);
    });
}

use eframe::egui::{self, FontId, Response, TextStyle, Ui, Widget};

// TextEdit adds this much around the text rows.
const FRAME_PADDING: f32 = 8.0;

/// Visual rows needed for `text` when wrapped at `wrap_width`.
pub fn visual_rows(text: &str, wrap_width: f32, glyph_width: f32) -> usize {
    let columns = if glyph_width > 0.0 && wrap_width > glyph_width {
        (wrap_width / glyph_width).floor() as usize
    } else {
        1
    };

    text.split('\n')
        .map(|line| {
            let chars = line.chars().count();
            chars.div_ceil(columns).max(1)
        })
        .sum()
}

/// Height that fits every visual row, never below `min_height`.
pub fn editor_height(
    text: &str,
    wrap_width: f32,
    glyph_width: f32,
    row_height: f32,
    min_height: f32,
) -> f32 {
    let rows = visual_rows(text, wrap_width, glyph_width) as f32;
    (rows * row_height + 2.0 * FRAME_PADDING).max(min_height)
}

/// Monospace multi-line input that grows with its content.
///
/// The height is recomputed every frame from the current text and the
/// available width, so edits and window resizes both reflow it.
pub struct CodeEditor<'t> {
    text: &'t mut String,
    hint: &'t str,
    min_height: f32,
    enabled: bool,
}

impl<'t> CodeEditor<'t> {
    pub fn new(text: &'t mut String) -> Self {
        Self {
            text,
            hint: "",
            min_height: 150.0,
            enabled: true,
        }
    }

    pub fn hint_text(mut self, hint: &'t str) -> Self {
        self.hint = hint;
        self
    }

    pub fn min_height(mut self, min_height: f32) -> Self {
        self.min_height = min_height;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Widget for CodeEditor<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let font_id: FontId = TextStyle::Monospace.resolve(ui.style());
        let (row_height, glyph_width) =
            ui.fonts(|fonts| (fonts.row_height(&font_id), fonts.glyph_width(&font_id, 'M')));
        let width = ui.available_width();
        let wrap_width = width - 2.0 * FRAME_PADDING;
        let height = editor_height(self.text, wrap_width, glyph_width, row_height, self.min_height);

        let edit = egui::TextEdit::multiline(self.text)
            .font(TextStyle::Monospace)
            .code_editor()
            .hint_text(self.hint)
            .desired_width(f32::INFINITY)
            .margin(egui::Margin::same(FRAME_PADDING as i8));

        ui.add_enabled_ui(self.enabled, |ui| ui.add_sized([width, height], edit))
            .inner
    }
}

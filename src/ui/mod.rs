pub mod code_editor;
pub mod results;

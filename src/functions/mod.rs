pub mod format;
pub mod prompt;
pub mod ui;

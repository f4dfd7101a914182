pub mod console_log;
pub mod dialog;
pub mod status_bar;

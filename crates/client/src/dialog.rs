#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// Modal message box drawn over the console until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl Dialog {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

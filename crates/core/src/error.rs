use thiserror::Error;

/// Failures while touching the console display surface.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("display surface has been destroyed")]
    Destroyed,

    #[error("display surface is read-only")]
    ReadOnly,
}

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("window has been destroyed")]
    Destroyed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    #[error("Configuration error: {0}")]
    Config(String),
}

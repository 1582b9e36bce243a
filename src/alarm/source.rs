//! What the alarm plays.

use std::path::PathBuf;

/// Sound played when a brew completes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlarmSound {
    /// Built-in three tone beep
    #[default]
    Beep,
    /// A user supplied audio file
    File {
        /// Path to the audio file
        path: PathBuf,
    },
}

impl AlarmSound {
    /// Uses the given file when present, the built-in beep otherwise.
    #[must_use]
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File { path },
            None => Self::Beep,
        }
    }

    /// Short name for log output.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Beep => "beep".to_string(),
            Self::File { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    #[must_use]
    pub fn is_beep(&self) -> bool {
        matches!(self, Self::Beep)
    }
}

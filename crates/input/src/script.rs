use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::snapshot::InputSnapshot;

/// Errors from loading an input script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read input script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse input script: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// One step of a script: key changes applied at the start of the step, then
/// held for `ticks` frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub press: Vec<String>,
    #[serde(default)]
    pub release: Vec<String>,
    #[serde(default = "default_ticks")]
    pub ticks: u32,
}

fn default_ticks() -> u32 {
    1
}

/// Recorded key presses replayed into an [`InputSnapshot`], one frame at a
/// time. Used for headless runs.
///
/// ```yaml
/// - press: [w]
///   ticks: 60
/// - release: [w]
///   press: [d]
///   ticks: 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(yaml: &str) -> Result<Self, ScriptError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Total number of frames the script covers.
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.ticks)).sum()
    }

    pub fn player(&self) -> ScriptPlayer<'_> {
        ScriptPlayer {
            steps: &self.steps,
            next_step: 0,
            remaining: 0,
        }
    }
}

/// Cursor over an [`InputScript`].
#[derive(Debug)]
pub struct ScriptPlayer<'a> {
    steps: &'a [ScriptStep],
    next_step: usize,
    remaining: u32,
}

impl ScriptPlayer<'_> {
    /// Prepare `input` for the next frame. Returns false once the script is
    /// exhausted. Zero-tick steps apply their key changes and fall through to
    /// the following step within the same frame.
    pub fn advance(&mut self, input: &mut InputSnapshot) -> bool {
        while self.remaining == 0 {
            let Some(step) = self.steps.get(self.next_step) else {
                return false;
            };
            for key in &step.release {
                input.release(key);
            }
            for key in &step.press {
                input.press(key);
            }
            tracing::trace!(step = self.next_step, ticks = step.ticks, "script step");
            self.remaining = step.ticks;
            self.next_step += 1;
        }
        self.remaining -= 1;
        true
    }
}

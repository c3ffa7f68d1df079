//! Replay scripts: timed pointer events in RON

use std::path::Path;

use anyhow::{Context, Result, bail};
use journey_core::PointerEvent;
use serde::{Deserialize, Serialize};

/// One scripted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Script time in milliseconds
    pub at_ms: u64,
    pub event: PointerEvent,
    /// Resolve the target by hit-testing the position instead of trusting
    /// the scripted target
    #[serde(default)]
    pub pick: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl ReplayScript {
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let script: ReplayScript = ron::from_str(content).context("parsing replay script")?;
        script.check_order()?;
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading replay script {}", path.display()))?;
        let script = Self::from_ron_str(&content)?;
        tracing::info!("Loaded {} step(s) from {:?}", script.steps.len(), path);
        Ok(script)
    }

    /// Script time must not run backwards
    fn check_order(&self) -> Result<()> {
        for (index, pair) in self.steps.windows(2).enumerate() {
            if pair[1].at_ms < pair[0].at_ms {
                bail!(
                    "step {} at {} ms comes before step {} at {} ms",
                    index + 1,
                    pair[1].at_ms,
                    index,
                    pair[0].at_ms
                );
            }
        }
        Ok(())
    }

    /// Time of the last step
    pub fn duration_ms(&self) -> u64 {
        self.steps.last().map_or(0, |step| step.at_ms)
    }
}

//! Command-line arguments

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use journey_core::ZoneConfig;

/// Replay a scripted zone-editing session and print what consumers see
#[derive(Debug, Parser)]
#[command(name = "journey-replay", version, about)]
pub struct ReplayArgs {
    /// RON script of timed pointer events
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Zone configuration file (RON); defaults apply when omitted
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the maximum zone radius
    #[arg(long = "max-radius-km", value_name = "KM")]
    pub max_radius_km: Option<f64>,

    /// Quiet period before a journey query is issued, in script milliseconds
    #[arg(long = "debounce-ms", value_name = "MS", default_value_t = 250)]
    pub debounce_ms: u64,

    /// Also print the render features of every frame as GeoJSON
    #[arg(long = "features", action = clap::ArgAction::SetTrue)]
    pub features: bool,
}

impl ReplayArgs {
    /// Build the zone configuration from the file and overrides
    pub fn zone_config(&self) -> Result<ZoneConfig> {
        let mut config = match &self.config {
            Some(path) => ZoneConfig::load(path)
                .with_context(|| format!("loading zone config {}", path.display()))?,
            None => ZoneConfig::default(),
        };
        if let Some(max_radius_km) = self.max_radius_km {
            config = config.with_max_radius_km(max_radius_km);
            config.validate().context("--max-radius-km")?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let args = ReplayArgs::try_parse_from([
            "journey-replay",
            "session.ron",
            "--config",
            "zones.ron",
            "--max-radius-km",
            "1.5",
            "--debounce-ms",
            "100",
            "--features",
        ])
        .unwrap();
        assert_eq!(args.script, PathBuf::from("session.ron"));
        assert_eq!(args.config, Some(PathBuf::from("zones.ron")));
        assert_eq!(args.max_radius_km, Some(1.5));
        assert_eq!(args.debounce_ms, 100);
        assert!(args.features);
    }

    #[test]
    fn test_defaults() {
        let args = ReplayArgs::try_parse_from(["journey-replay", "session.ron"]).unwrap();
        assert_eq!(args.debounce_ms, 250);
        assert!(!args.features);
        assert_eq!(args.zone_config().unwrap(), ZoneConfig::default());
    }

    #[test]
    fn test_bad_radius_override() {
        let args = ReplayArgs::try_parse_from([
            "journey-replay",
            "session.ron",
            "--max-radius-km=-1",
        ])
        .unwrap();
        assert!(args.zone_config().is_err());
    }
}

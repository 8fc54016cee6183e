//! Tunable game parameters.
//!
//! Defaults reproduce the classic feel: a 35px bird, 70px pipes with a 180px
//! gap, and a win at ten pipes. Values can be overridden from
//! `~/.flappy/config.json` or the command line; either way the geometry is
//! validated once at startup and a bad combination is fatal.

use crate::core::constants::*;
use crate::core::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// A configuration that cannot produce a playable field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(
        "pipe gap {gap} with margin {margin} does not fit above ground at y={ground_y} \
         (ground_y - gap must exceed 2 x margin)"
    )]
    GapDoesNotFit { ground_y: f64, gap: f64, margin: f64 },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error(
        "field width {width} leaves no room for a pipe right of the bird \
         (needs more than {needed})"
    )]
    FieldTooNarrow { width: f64, needed: f64 },
    #[error("field height {height} leaves no room above ground height {ground_height}")]
    FieldTooShort { height: f64, ground_height: f64 },
}

/// Inclusive vertical range the top of a pipe gap may be placed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapRange {
    pub min: f64,
    pub max: f64,
}

impl GapRange {
    /// Range of gap tops that keep `margin` clear of both the ceiling and the
    /// ground at `ground_y`.
    ///
    /// `ground_y - gap` must exceed twice the margin, otherwise no gap can be
    /// framed by both margins.
    pub fn within(ground_y: f64, gap: f64, margin: f64) -> Result<Self, ConfigError> {
        let finite = ground_y.is_finite() && gap.is_finite() && margin.is_finite();
        if !finite || margin < 0.0 || ground_y - gap <= 2.0 * margin {
            return Err(ConfigError::GapDoesNotFit {
                ground_y,
                gap,
                margin,
            });
        }
        Ok(Self {
            min: margin,
            max: ground_y - gap - margin,
        })
    }

    pub fn contains(&self, gap_top: f64) -> bool {
        gap_top >= self.min && gap_top <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field_width: f64,
    pub field_height: f64,
    pub ground_height: f64,

    pub bird_x: f64,
    pub bird_width: f64,
    pub bird_height: f64,
    pub gravity: f64,
    pub jump_impulse: f64,
    pub max_velocity: f64,

    pub pipe_width: f64,
    pub pipe_gap: f64,
    pub pipe_speed: f64,
    pub spawn_interval_ticks: u32,
    pub min_gap_margin: f64,

    pub max_score: u32,
    pub starting_lives: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
            ground_height: GROUND_HEIGHT,

            bird_x: BIRD_X,
            bird_width: BIRD_WIDTH,
            bird_height: BIRD_HEIGHT,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            max_velocity: MAX_VELOCITY,

            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            pipe_speed: PIPE_SPEED,
            spawn_interval_ticks: PIPE_SPAWN_INTERVAL_TICKS,
            min_gap_margin: MIN_GAP_MARGIN,

            max_score: MAX_SCORE,
            starting_lives: STARTING_LIVES,
        }
    }
}

impl GameConfig {
    /// Load a config from a JSON file.
    ///
    /// A missing file yields the defaults. A malformed file also yields the
    /// defaults, with a warning, so a typo never blocks play.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Like `load_or_default`, but with no file at all when there is no
    /// place to look for one.
    pub fn load(path: Option<&Path>) -> Self {
        path.map(Self::load_or_default).unwrap_or_default()
    }

    /// Check every invariant against the configured field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numbers = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("ground_height", self.ground_height),
            ("bird_x", self.bird_x),
            ("bird_width", self.bird_width),
            ("bird_height", self.bird_height),
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("max_velocity", self.max_velocity),
            ("pipe_width", self.pipe_width),
            ("pipe_gap", self.pipe_gap),
            ("pipe_speed", self.pipe_speed),
            ("min_gap_margin", self.min_gap_margin),
        ];
        if let Some(&(field, _)) = numbers.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NotFinite { field });
        }

        let positives = [
            ("field_width", self.field_width),
            ("bird_width", self.bird_width),
            ("bird_height", self.bird_height),
            ("pipe_width", self.pipe_width),
            ("pipe_gap", self.pipe_gap),
            ("pipe_speed", self.pipe_speed),
            ("max_velocity", self.max_velocity),
        ];
        for (field, value) in positives {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field });
            }
        }

        let non_negatives = [
            ("ground_height", self.ground_height),
            ("bird_x", self.bird_x),
            ("min_gap_margin", self.min_gap_margin),
        ];
        for (field, value) in non_negatives {
            if value < 0.0 {
                return Err(ConfigError::Negative { field });
            }
        }

        if self.spawn_interval_ticks == 0 {
            return Err(ConfigError::NotPositive {
                field: "spawn_interval_ticks",
            });
        }
        if self.max_score == 0 {
            return Err(ConfigError::NotPositive { field: "max_score" });
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::NotPositive {
                field: "starting_lives",
            });
        }
        self.fit(&Viewport::from_config(self)).map(|_| ())
    }

    /// Valid gap-top range for a field of the given height.
    pub fn gap_range(&self, field_height: f64) -> Result<GapRange, ConfigError> {
        if !field_height.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "field_height",
            });
        }
        let ground_y = field_height - self.ground_height;
        if ground_y <= 0.0 {
            return Err(ConfigError::FieldTooShort {
                height: field_height,
                ground_height: self.ground_height,
            });
        }
        GapRange::within(ground_y, self.pipe_gap, self.min_gap_margin)
    }

    /// Check that `viewport` is playable with these parameters: a gap fits
    /// above the ground and a pipe spawning at the right edge lies wholly
    /// right of the bird.
    pub fn fit(&self, viewport: &Viewport) -> Result<GapRange, ConfigError> {
        if !viewport.width.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "field_width",
            });
        }
        if !viewport.ground_height.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "ground_height",
            });
        }
        if viewport.ground_height < 0.0 {
            return Err(ConfigError::Negative {
                field: "ground_height",
            });
        }

        let needed = self.bird_x + self.bird_width + self.pipe_width;
        if viewport.width <= needed {
            return Err(ConfigError::FieldTooNarrow {
                width: viewport.width,
                needed,
            });
        }

        let ground_y = viewport.ground_y();
        if !viewport.height.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "field_height",
            });
        }
        if ground_y <= 0.0 {
            return Err(ConfigError::FieldTooShort {
                height: viewport.height,
                ground_height: viewport.ground_height,
            });
        }
        GapRange::within(ground_y, self.pipe_gap, self.min_gap_margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_gap_range_for_ground_at_800() {
        let config = GameConfig::default();
        // ground_y = 900 - 100 = 800
        let range = config.gap_range(900.0).unwrap();
        assert_eq!(range.min, 100.0);
        assert_eq!(range.max, 520.0);
    }

    #[test]
    fn test_gap_that_does_not_fit_is_rejected() {
        let config = GameConfig::default();
        // ground_y = 380, 380 - 180 = 200, not greater than 2 x 100
        let err = config.gap_range(480.0).unwrap_err();
        assert!(matches!(err, ConfigError::GapDoesNotFit { .. }));
    }

    #[test]
    fn test_field_shorter_than_ground_is_rejected() {
        let config = GameConfig::default();
        assert!(matches!(
            config.gap_range(50.0),
            Err(ConfigError::FieldTooShort { .. })
        ));
    }

    #[test]
    fn test_zero_spawn_interval_is_rejected() {
        let config = GameConfig {
            spawn_interval_ticks: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "spawn_interval_ticks"
            })
        );
    }

    #[test]
    fn test_negative_speed_is_rejected() {
        let config = GameConfig {
            pipe_speed: -1.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "pipe_speed"
            })
        );
    }

    #[test]
    fn test_non_finite_field_height_is_rejected() {
        for height in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = GameConfig {
                field_height: height,
                ..GameConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::NotFinite {
                    field: "field_height"
                })
            );
        }
    }

    #[test]
    fn test_non_finite_physics_is_rejected() {
        let config = GameConfig {
            gravity: f64::NAN,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "gravity" })
        );

        let config = GameConfig {
            jump_impulse: f64::NEG_INFINITY,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotFinite {
                field: "jump_impulse"
            })
        );
    }

    #[test]
    fn test_negative_margin_is_rejected() {
        let config = GameConfig {
            min_gap_margin: -300.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "min_gap_margin"
            })
        );
        assert!(GapRange::within(700.0, 180.0, -300.0).is_err());
    }

    #[test]
    fn test_negative_ground_is_rejected() {
        let config = GameConfig {
            ground_height: -50.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "ground_height"
            })
        );
    }

    #[test]
    fn test_gap_range_rejects_non_finite_ground() {
        assert!(GapRange::within(f64::INFINITY, 180.0, 100.0).is_err());
        assert!(GapRange::within(f64::NAN, 180.0, 100.0).is_err());
    }

    #[test]
    fn test_field_narrower_than_bird_lane_is_rejected() {
        // 150 + 35 + 70 = 255
        let config = GameConfig {
            field_width: 255.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FieldTooNarrow {
                width: 255.0,
                needed: 255.0
            })
        );

        let config = GameConfig {
            field_width: 256.0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_fit_checks_every_viewport_dimension() {
        let config = GameConfig::default();
        assert!(config.fit(&Viewport::new(1280.0, 800.0, 100.0)).is_ok());
        assert!(matches!(
            config.fit(&Viewport::new(83.3, 800.0, 100.0)),
            Err(ConfigError::FieldTooNarrow { .. })
        ));
        assert!(matches!(
            config.fit(&Viewport::new(1280.0, f64::INFINITY, 100.0)),
            Err(ConfigError::NotFinite { .. })
        ));
        assert!(matches!(
            config.fit(&Viewport::new(1280.0, 800.0, f64::NAN)),
            Err(ConfigError::NotFinite { .. })
        ));
        assert!(matches!(
            config.fit(&Viewport::new(1280.0, 80.0, 100.0)),
            Err(ConfigError::FieldTooShort { .. })
        ));
    }

    #[test]
    fn test_load_without_path_returns_default() {
        assert_eq!(GameConfig::load(None), GameConfig::default());
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load_or_default(&dir.path().join("nope.json"));
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{ "max_score": 5, "pipe_gap": 200.0 }}"#).unwrap();

        let config = GameConfig::load_or_default(&path);
        assert_eq!(config.max_score, 5);
        assert_eq!(config.pipe_gap, 200.0);
        assert_eq!(config.starting_lives, STARTING_LIVES);
    }

    #[test]
    fn test_load_malformed_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(GameConfig::load_or_default(&path), GameConfig::default());
    }
}

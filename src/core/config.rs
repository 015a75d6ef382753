//! Match configuration with documented constants
//!
//! Every tunable number of a match lives here. Defaults reproduce the
//! reference tuning (sprites drawn at 2x, physics normalised by a 2.5 scale).
//! Configs can be loaded from TOML; `validate()` is the only place a bad
//! value is reported, the per-tick simulation trusts what it is given.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{DuelError, Result};

/// Stage geometry and global physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Width of the playable stage (world units)
    pub width: f32,

    /// Ground height; fighters stand with their feet at this y (y grows upward)
    pub floor_y: f32,

    /// Padding kept between a fighter's body and either stage edge
    pub margin: f32,

    /// Vertical acceleration applied every tick (negative pulls down)
    pub gravity: f32,

    /// Multiplier for the knockback constants
    ///
    /// Knockback values are tuned against a base sprite scale; this keeps
    /// their feel constant when the art is drawn larger or smaller.
    pub physics_scale: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            floor_y: 90.0,
            margin: 20.0,
            gravity: -2200.0 * 2.5,
            physics_scale: 2.5,
        }
    }
}

/// Timing and payload of the single attack every fighter has
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Wind-up before the hitbox can connect (seconds)
    pub startup: f32,
    /// Window in which the hitbox can connect (seconds)
    pub active: f32,
    /// Cool-down after the active window (seconds)
    pub recovery: f32,
    /// Hitbox used when the animation has no usable frame size
    pub hitbox_w: f32,
    pub hitbox_h: f32,
    /// Health removed by one connecting hit
    pub damage: i32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            startup: 0.08,
            active: 0.30,
            recovery: 0.22,
            hitbox_w: 160.0,
            hitbox_h: 48.0,
            damage: 10,
        }
    }
}

impl AttackConfig {
    /// Total length of one attack from start to release
    pub fn total_duration(&self) -> f32 {
        self.startup + self.active + self.recovery
    }
}

/// Per-fighter movement and body configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterConfig {
    pub max_hp: i32,
    /// Horizontal run speed (world units per second)
    pub move_speed: f32,
    /// Initial upward velocity of a jump
    pub jump_speed: f32,
    /// Source pixels to world units
    pub render_scale: f32,
    /// Nominal sprite frame size in source pixels
    ///
    /// Used for stage clamping (body size = frame_px * render_scale) and as
    /// the frame size of animations that carry no frame table entry.
    pub frame_px: f32,
    pub attack: AttackConfig,
}

impl Default for FighterConfig {
    fn default() -> Self {
        Self {
            max_hp: 100,
            move_speed: 420.0 * 0.65,
            jump_speed: 980.0,
            render_scale: 2.0,
            frame_px: 96.0,
            attack: AttackConfig::default(),
        }
    }
}

impl FighterConfig {
    /// Width of the fighter's body in world units
    pub fn body_size(&self) -> f32 {
        self.frame_px * self.render_scale
    }
}

/// What happens when the round clock reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUpRule {
    /// Clock is display only; the round continues until a knockout
    #[default]
    Cosmetic,
    /// Round ends at zero; the fighter with more health takes it
    HigherHealthWins,
}

/// Round and match sequencing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Round wins needed to take the match (2 = best of three)
    pub wins_to_take_match: u32,
    /// Countdown shown at the start of each round
    pub round_seconds: u32,
    /// Delay between round intro and the fight starting
    pub intro_seconds: f32,
    /// Delay between a knockout and the next round (or match end)
    pub round_over_seconds: f32,
    pub time_up: TimeUpRule,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            wins_to_take_match: 2,
            round_seconds: 60,
            intro_seconds: 3.0,
            round_over_seconds: 5.1,
            time_up: TimeUpRule::Cosmetic,
        }
    }
}

/// Opponent AI tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Base re-think interval (seconds); scaled by range
    pub think_interval: f32,
    /// Closer than this: Pressure
    pub pressure_range: f32,
    /// Closer than this (and not pressuring): Approach
    pub approach_range: f32,
    /// Cornered and closer than this: Evade
    pub evade_range: f32,
    /// Attack on cooldown whenever closer than this, even mid-state
    pub poke_range: f32,
    /// Horizontal reach of the anti-air swat
    pub anti_air_range: f32,
    /// Height above the floor at which the opponent counts as airborne
    pub anti_air_height: f32,
    /// Chance of swatting an airborne opponent in range
    pub anti_air_chance: f32,
    /// Distance from either stage bound that counts as cornered
    pub corner_margin: f32,
    /// Gap Pressure keeps between the two hurtboxes
    pub pressure_standoff: f32,
    /// Attack cooldown is drawn uniformly from this range (seconds)
    pub attack_cooldown_min: f32,
    pub attack_cooldown_max: f32,
    /// Minimum time between AI jumps
    pub jump_cooldown: f32,
    /// Chance per tick of jumping while approaching or evading
    pub jump_chance: f32,
    /// Approach only jumps in from further than this
    pub jump_in_range: f32,
    /// Idle time that forces an attack
    pub stalemate_seconds: f32,
    /// Below this per-tick displacement the fighter counts as stationary
    pub stationary_epsilon: f32,
    /// Weight of Approach over Pressure when far away
    pub far_approach_weight: f32,
    /// Seed for the AI's random rolls
    pub seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            think_interval: 0.14,
            pressure_range: 170.0,
            approach_range: 320.0,
            evade_range: 200.0,
            poke_range: 150.0,
            anti_air_range: 200.0,
            anti_air_height: 70.0,
            anti_air_chance: 0.95,
            corner_margin: 60.0,
            pressure_standoff: 8.0,
            attack_cooldown_min: 1.2,
            attack_cooldown_max: 1.5,
            jump_cooldown: 1.2,
            jump_chance: 0.02,
            jump_in_range: 260.0,
            stalemate_seconds: 1.5,
            stationary_epsilon: 0.5,
            far_approach_weight: 0.8,
            seed: 42,
        }
    }
}

/// Complete configuration of a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub stage: StageConfig,
    pub fighter: FighterConfig,
    pub rounds: RoundConfig,
    pub ai: AiConfig,
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: MatchConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(DuelError::InvalidConfig(msg));

        let stage = &self.stage;
        if stage.width <= 0.0 || stage.margin < 0.0 {
            return invalid(format!(
                "stage width ({}) must be positive and margin ({}) non-negative",
                stage.width, stage.margin
            ));
        }
        let body = self.fighter.body_size();
        if body + 2.0 * stage.margin >= stage.width {
            return invalid(format!(
                "fighter body ({body}) plus margins does not fit on a {} wide stage",
                stage.width
            ));
        }
        if stage.gravity >= 0.0 {
            return invalid(format!("gravity ({}) must pull downward", stage.gravity));
        }

        let fighter = &self.fighter;
        if fighter.max_hp <= 0 {
            return invalid(format!("max_hp ({}) must be positive", fighter.max_hp));
        }
        if fighter.move_speed <= 0.0 || fighter.jump_speed <= 0.0 {
            return invalid("move_speed and jump_speed must be positive".into());
        }
        if fighter.render_scale <= 0.0 || fighter.frame_px <= 0.0 {
            return invalid("render_scale and frame_px must be positive".into());
        }

        let attack = &fighter.attack;
        if attack.damage < 0 {
            return invalid(format!("attack damage ({}) must not be negative", attack.damage));
        }
        if attack.startup < 0.0 || attack.active <= 0.0 || attack.recovery < 0.0 {
            return invalid(format!(
                "attack durations must not be negative and active must be positive \
                 (startup {}, active {}, recovery {})",
                attack.startup, attack.active, attack.recovery
            ));
        }

        if self.rounds.wins_to_take_match == 0 {
            return invalid("wins_to_take_match must be at least 1".into());
        }
        if self.rounds.intro_seconds < 0.0 || self.rounds.round_over_seconds < 0.0 {
            return invalid("round delays must not be negative".into());
        }

        let ai = &self.ai;
        if ai.attack_cooldown_min > ai.attack_cooldown_max || ai.attack_cooldown_min < 0.0 {
            return invalid(format!(
                "attack cooldown range ({}..{}) is inverted or negative",
                ai.attack_cooldown_min, ai.attack_cooldown_max
            ));
        }
        if ai.pressure_standoff < 0.0 {
            return invalid(format!("pressure_standoff ({}) must not be negative", ai.pressure_standoff));
        }
        if ai.think_interval <= 0.0 {
            return invalid(format!("think_interval ({}) must be positive", ai.think_interval));
        }
        if ai.pressure_range > ai.approach_range {
            return invalid(format!(
                "pressure_range ({}) should be <= approach_range ({})",
                ai.pressure_range, ai.approach_range
            ));
        }
        for (name, p) in [
            ("anti_air_chance", ai.anti_air_chance),
            ("jump_chance", ai.jump_chance),
            ("far_approach_weight", ai.far_approach_weight),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} ({p}) must be a probability"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fighter.max_hp, 100);
        assert_eq!(config.rounds.wins_to_take_match, 2);
        assert_eq!(config.fighter.attack.damage, 10);
    }

    #[test]
    fn test_attack_total_duration() {
        let attack = AttackConfig::default();
        assert!((attack.total_duration() - 0.60).abs() < 1e-6);
    }

    #[test]
    fn test_negative_damage_rejected() {
        let mut config = MatchConfig::default();
        config.fighter.attack.damage = -5;
        assert!(matches!(config.validate(), Err(DuelError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let mut config = MatchConfig::default();
        config.fighter.attack.recovery = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_cooldown_rejected() {
        let mut config = MatchConfig::default();
        config.ai.attack_cooldown_min = 2.0;
        config.ai.attack_cooldown_max = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_standoff_rejected() {
        let mut config = MatchConfig::default();
        config.ai.pressure_standoff = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_body_must_fit_stage() {
        let mut config = MatchConfig::default();
        config.stage.width = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = r#"
            [rounds]
            wins_to_take_match = 3
            time_up = "higher_health_wins"

            [fighter.attack]
            damage = 25
        "#;
        let config = MatchConfig::from_toml_str(text).expect("partial config should parse");
        assert_eq!(config.rounds.wins_to_take_match, 3);
        assert_eq!(config.rounds.time_up, TimeUpRule::HigherHealthWins);
        assert_eq!(config.fighter.attack.damage, 25);
        assert_eq!(config.fighter.attack.startup, 0.08);
        assert_eq!(config.stage.width, 1280.0);
    }

    #[test]
    fn test_sample_config_parses() {
        let config = MatchConfig::from_toml_str(include_str!("../../data/match.toml"))
            .expect("shipped sample config should be valid");
        assert_eq!(config.ai.seed, 42);
        assert_eq!(config.rounds.time_up, TimeUpRule::Cosmetic);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let text = "[fighter]\nmax_hp = 0\n";
        assert!(MatchConfig::from_toml_str(text).is_err());
    }
}

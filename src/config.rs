//! Tunable gameplay parameters.
//!
//! Every timer here is a frame count and every speed is in tiles per tick. Values are
//! layered with `figment`: built-in defaults, then an optional JSON file, then
//! `HOLLOW_`-prefixed environment variables (nested keys split on `__`, e.g.
//! `HOLLOW_ENEMY__STARE_THRESHOLD=120`).

use std::path::Path;

use bevy_ecs::resource::Resource;
use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RAY_COUNT, KEY_LOCKERS};
use crate::error::{GameError, GameResult};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub noise: NoiseTuning,
    pub battery: BatteryTuning,
    pub enemy: EnemyTuning,
    pub combat: CombatTuning,
    pub script: ScriptTuning,
    pub render: RenderTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Collision footprint radius.
    pub radius: f32,
    pub walk_speed: f32,
    pub run_multiplier: f32,
    pub sneak_multiplier: f32,
    /// Pitch clamp, in radians either side of level.
    pub max_pitch: f32,
    pub interact_radius: f32,
    /// Ticks between footstep cues while walking (halved when running).
    pub footstep_interval: u32,
    /// Whether the player starts with a working light source.
    pub start_with_light: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseTuning {
    /// Multiplicative decay applied every tick.
    pub decay: f32,
    pub sneak_floor: f32,
    pub walk_floor: f32,
    pub run_floor: f32,
    /// Noise below this snaps to zero.
    pub cutoff: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryTuning {
    pub drain_per_tick: f32,
    pub low_threshold: f32,
    pub flicker_chance: f64,
    pub locker_recharge: f32,
    /// Chance a key-less locker holds a battery.
    pub locker_battery_chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub radius: f32,
    pub idle_to_stalk_chance: f64,
    pub detection_radius: f32,
    pub detection_noise: f32,
    pub stalk_speed: f32,
    pub hunt_speed: f32,
    /// Beyond this distance (and out of view) a stalking enemy may teleport closer.
    pub stalk_max_distance: f32,
    pub teleport_cooldown: u32,
    pub teleport_min_distance: f32,
    pub teleport_max_distance: f32,
    /// Angular spread around the player's back, in radians.
    pub teleport_spread: f32,
    /// Consecutive lit ticks before a stalking enemy is banished.
    pub stare_threshold: u32,
    pub escalate_distance: f32,
    pub escalate_chance: f64,
    pub hunt_lose_distance: f32,
    pub contact_radius: f32,
    pub visibility_range: f32,
    /// Chance per frame that an invisible stalker is drawn anyway.
    pub flicker_through_chance: f64,
    pub ghost_step_interval: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub melee_range: f32,
    pub attack_cooldown: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptTuning {
    pub required_keys: u32,
    pub intro_ticks: u32,
    pub message_ticks: u32,
    pub jump_scare_chance: f64,
    pub jump_scare_ticks: u32,
    pub jump_scare_cooldown: u32,
    pub death_sequence_ticks: u32,
    pub shadow_chance: f64,
    pub shadow_ticks: u32,
    pub teleport_shadow_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderTuning {
    pub ray_count: usize,
    /// Horizontal field of view, in degrees.
    pub fov_degrees: f32,
    pub base_brightness: f32,
    /// Brightness multiplier for walls hit on their Y side.
    pub side_darkening: f32,
    /// Light falloff distance with the torch on.
    pub flashlight_range: f32,
    /// Light falloff distance in the dark.
    pub ambient_range: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            noise: NoiseTuning::default(),
            battery: BatteryTuning::default(),
            enemy: EnemyTuning::default(),
            combat: CombatTuning::default(),
            script: ScriptTuning::default(),
            render: RenderTuning::default(),
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 0.2,
            walk_speed: 0.045,
            run_multiplier: 1.8,
            sneak_multiplier: 0.45,
            max_pitch: 0.6,
            interact_radius: 1.3,
            footstep_interval: 22,
            start_with_light: false,
        }
    }
}

impl Default for NoiseTuning {
    fn default() -> Self {
        Self {
            decay: 0.97,
            sneak_floor: 0.05,
            walk_floor: 0.35,
            run_floor: 0.9,
            cutoff: 1e-4,
        }
    }
}

impl Default for BatteryTuning {
    fn default() -> Self {
        Self {
            // 1/128 is exact in binary, so a full battery drains in exactly 12_800 ticks
            drain_per_tick: 1.0 / 128.0,
            low_threshold: 20.0,
            flicker_chance: 0.08,
            locker_recharge: 40.0,
            locker_battery_chance: 0.35,
        }
    }
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            radius: 0.3,
            idle_to_stalk_chance: 0.002,
            detection_radius: 8.0,
            detection_noise: 0.5,
            stalk_speed: 0.03,
            hunt_speed: 0.065,
            stalk_max_distance: 10.0,
            teleport_cooldown: 300,
            teleport_min_distance: 4.0,
            teleport_max_distance: 7.0,
            teleport_spread: 0.9,
            stare_threshold: 90,
            escalate_distance: 3.0,
            escalate_chance: 0.01,
            hunt_lose_distance: 16.0,
            contact_radius: 0.5,
            visibility_range: 7.0,
            flicker_through_chance: 0.04,
            ghost_step_interval: 20,
        }
    }
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            melee_range: 1.6,
            attack_cooldown: 45,
        }
    }
}

impl Default for ScriptTuning {
    fn default() -> Self {
        Self {
            required_keys: KEY_LOCKERS as u32,
            intro_ticks: 240,
            message_ticks: 150,
            jump_scare_chance: 0.15,
            jump_scare_ticks: 45,
            jump_scare_cooldown: 600,
            death_sequence_ticks: 150,
            shadow_chance: 0.0008,
            shadow_ticks: 40,
            teleport_shadow_ticks: 30,
        }
    }
}

impl Default for RenderTuning {
    fn default() -> Self {
        Self {
            ray_count: DEFAULT_RAY_COUNT,
            fov_degrees: 66.0,
            base_brightness: 0.9,
            side_darkening: 0.7,
            flashlight_range: 9.0,
            ambient_range: 3.5,
        }
    }
}

impl Tuning {
    /// Loads tuning from defaults, an optional JSON file, and `HOLLOW_*` environment variables.
    pub fn load(path: Option<&Path>) -> GameResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Tuning::default()));
        if let Some(path) = path {
            figment = figment.merge(Json::file(path));
        }
        let tuning: Tuning = figment.merge(Env::prefixed("HOLLOW_").split("__")).extract()?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Layers a JSON document over the defaults. Missing keys keep their default value.
    pub fn from_json_str(json: &str) -> GameResult<Self> {
        let tuning: Tuning = Figment::from(Serialized::defaults(Tuning::default()))
            .merge(Json::string(json))
            .extract()?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Rejects values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Config` naming the first offending key: a chance outside
    /// `[0, 1]`, a negative speed, distance or rate, an inverted teleport band, or an
    /// unusable render setup.
    pub fn validate(&self) -> GameResult<()> {
        let chances = [
            ("battery.flicker_chance", self.battery.flicker_chance),
            ("battery.locker_battery_chance", self.battery.locker_battery_chance),
            ("enemy.idle_to_stalk_chance", self.enemy.idle_to_stalk_chance),
            ("enemy.escalate_chance", self.enemy.escalate_chance),
            ("enemy.flicker_through_chance", self.enemy.flicker_through_chance),
            ("script.jump_scare_chance", self.script.jump_scare_chance),
            ("script.shadow_chance", self.script.shadow_chance),
        ];
        for (key, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(format!("{key} must be within [0, 1], got {chance}")));
            }
        }

        if !(0.0..=1.0).contains(&self.noise.decay) {
            return Err(invalid(format!("noise.decay must be within [0, 1], got {}", self.noise.decay)));
        }

        let non_negative = [
            ("player.radius", self.player.radius),
            ("player.walk_speed", self.player.walk_speed),
            ("player.run_multiplier", self.player.run_multiplier),
            ("player.sneak_multiplier", self.player.sneak_multiplier),
            ("player.max_pitch", self.player.max_pitch),
            ("player.interact_radius", self.player.interact_radius),
            ("noise.sneak_floor", self.noise.sneak_floor),
            ("noise.walk_floor", self.noise.walk_floor),
            ("noise.run_floor", self.noise.run_floor),
            ("noise.cutoff", self.noise.cutoff),
            ("battery.drain_per_tick", self.battery.drain_per_tick),
            ("battery.low_threshold", self.battery.low_threshold),
            ("battery.locker_recharge", self.battery.locker_recharge),
            ("enemy.radius", self.enemy.radius),
            ("enemy.detection_radius", self.enemy.detection_radius),
            ("enemy.detection_noise", self.enemy.detection_noise),
            ("enemy.stalk_speed", self.enemy.stalk_speed),
            ("enemy.hunt_speed", self.enemy.hunt_speed),
            ("enemy.stalk_max_distance", self.enemy.stalk_max_distance),
            ("enemy.teleport_min_distance", self.enemy.teleport_min_distance),
            ("enemy.teleport_max_distance", self.enemy.teleport_max_distance),
            ("enemy.teleport_spread", self.enemy.teleport_spread),
            ("enemy.escalate_distance", self.enemy.escalate_distance),
            ("enemy.hunt_lose_distance", self.enemy.hunt_lose_distance),
            ("enemy.contact_radius", self.enemy.contact_radius),
            ("enemy.visibility_range", self.enemy.visibility_range),
            ("combat.melee_range", self.combat.melee_range),
            ("render.base_brightness", self.render.base_brightness),
            ("render.side_darkening", self.render.side_darkening),
            ("render.flashlight_range", self.render.flashlight_range),
            ("render.ambient_range", self.render.ambient_range),
        ];
        for (key, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(invalid(format!("{key} must not be negative, got {value}")));
            }
        }

        if self.enemy.teleport_min_distance > self.enemy.teleport_max_distance {
            return Err(invalid(format!(
                "enemy.teleport_min_distance ({}) exceeds enemy.teleport_max_distance ({})",
                self.enemy.teleport_min_distance, self.enemy.teleport_max_distance
            )));
        }

        if self.render.ray_count == 0 {
            return Err(invalid("render.ray_count must be at least 1".to_string()));
        }
        if !(self.render.fov_degrees > 0.0 && self.render.fov_degrees < 180.0) {
            return Err(invalid(format!(
                "render.fov_degrees must be within (0, 180), got {}",
                self.render.fov_degrees
            )));
        }

        Ok(())
    }

    /// Half of the horizontal field of view, in radians.
    pub fn half_fov(&self) -> f32 {
        self.render.fov_degrees.to_radians() * 0.5
    }
}

fn invalid(message: String) -> GameError {
    GameError::Config(figment::Error::from(message))
}

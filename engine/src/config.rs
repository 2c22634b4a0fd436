use serde::{Deserialize, Serialize};

/// Tunable setup parameters of a game session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub level_width: i32,
    pub level_height: i32,
    /// Number of wandering hostile robots on the test level.
    pub ai_units: usize,
    /// Message log lines kept before the oldest get dropped.
    pub log_capacity: usize,
    /// Most autonomous turns resolved during one call to the turn loop.
    pub ai_turns_per_frame: usize,
    pub seed: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            level_width: 100,
            level_height: 100,
            ai_units: 6,
            log_capacity: 100,
            ai_turns_per_frame: 256,
            seed: "robot".into(),
        }
    }
}

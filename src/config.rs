use std::{env, ops::RangeInclusive, str::FromStr};

use tracing::{info, warn};

use gridreact::field::DEFAULT_TIME_LIMIT_MS;

#[derive(Debug, Clone)]
pub struct Config {
    pub grid_size: usize,
    pub win_score: u32,
    pub time_limit_ms: u32,
    pub reaction_ms: RangeInclusive<u64>,
    pub rounds: u32,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        let reaction_min: u64 = env_or("REACTION_MIN_MS", 300);
        let reaction_max: u64 = env_or("REACTION_MAX_MS", 1200);

        let config = Self {
            grid_size: env_or("GRID_SIZE", 100),
            win_score: env_or("WIN_SCORE", 10),
            time_limit_ms: env_or("TIME_LIMIT_MS", DEFAULT_TIME_LIMIT_MS),
            reaction_ms: reaction_min.min(reaction_max)..=reaction_max.max(reaction_min),
            rounds: env_or("ROUNDS", 2),
        };

        info!(
            "Loaded config: {} cells, first to {}, {}ms time limit, reactions {:?}ms, {} rounds",
            config.grid_size,
            config.win_score,
            config.time_limit_ms,
            config.reaction_ms,
            config.rounds
        );
        config
    }
}

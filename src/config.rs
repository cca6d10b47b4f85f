use std::fmt;
use std::str::FromStr;

/// Strength of the built-in opponent; the value is its search depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy = 2,
    #[default]
    Medium = 3,
    Hard = 4,
}

impl Difficulty {
    pub fn depth(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("unknown difficulty: {}", s)),
        }
    }
}

/// Settings handed to a player when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Plies searched below the root moves
    pub depth: u32,
    pub difficulty: Difficulty,
    /// Seed for players that pick moves at random
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::from_difficulty(Difficulty::default())
    }
}

impl EngineConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        EngineConfig {
            depth: difficulty.depth(),
            difficulty,
            seed: 0,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_depths() {
        assert_eq!(Difficulty::Easy.depth(), 2);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
        assert_eq!(EngineConfig::default().depth, 3);
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_difficulty(Difficulty::Easy).with_depth(1).with_seed(7);
        assert_eq!(config.depth, 1);
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.seed, 7);
    }
}

use thiserror::Error;

pub const DEFAULT_INSTRUCTION_HZ: u32 = 500;
pub const DEFAULT_TIMER_HZ: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be greater than zero")]
    ZeroRate { name: &'static str },
}

/// Run-time settings shared by the frontends.
///
/// Instruction throughput and the timer rate are independent;
/// nothing ties one to the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub instruction_hz: u32,
    pub timer_hz: u32,
    /// Fixed seed for `CXNN`, or `None` to seed from entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instruction_hz: DEFAULT_INSTRUCTION_HZ,
            timer_hz: DEFAULT_TIMER_HZ,
            seed: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instruction_hz == 0 {
            return Err(ConfigError::ZeroRate { name: "instruction_hz" });
        }
        if self.timer_hz == 0 {
            return Err(ConfigError::ZeroRate { name: "timer_hz" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(500, config.instruction_hz);
        assert_eq!(60, config.timer_hz);
        assert_eq!(Ok(()), config.validate());
    }

    #[test]
    fn zero_rates_are_rejected() {
        let config = Config { timer_hz: 0, ..Config::default() };
        assert_eq!(Err(ConfigError::ZeroRate { name: "timer_hz" }), config.validate());
        let config = Config { instruction_hz: 0, ..Config::default() };
        assert_eq!("instruction_hz must be greater than zero", config.validate().unwrap_err().to_string());
    }
}

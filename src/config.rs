use std::fs;

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

quick_error! {
    #[derive(Debug)]
    pub enum ConfigError {
        Io(err: std::io::Error) {
            from()
            display("config read error: {}", err)
        }
        Parse(err: toml::de::Error) {
            from()
            display("config parse error: {}", err)
        }
    }
}

/// frontend configuration, loaded from a toml file
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dip: DipSwitches,
}

/// the cabinet DIP switches wired to port 2
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DipSwitches {
    /// number of ships per game, 3-6
    pub ships: u8,

    /// award the extra ship at 1000 points instead of 1500
    pub extra_ship_at_1000: bool,

    /// hide the coin info shown on the demo screen
    pub coin_info_off: bool,
}

impl Default for DipSwitches {
    fn default() -> Self {
        DipSwitches {
            ships: 6,
            extra_ship_at_1000: false,
            coin_info_off: false,
        }
    }
}

impl DipSwitches {
    /// the switch bits as they appear on input port 2
    pub fn port2_bits(&self) -> u8 {
        let ships = match self.ships {
            3 => 0b00,
            4 => 0b01,
            5 => 0b10,
            6 => 0b11,
            n => panic!("dip: {} ships is not wired on this cabinet", n),
        };
        let mut bits = ships;
        if self.extra_ship_at_1000 {
            bits |= 0x08;
        }
        if self.coin_info_off {
            bits |= 0x80;
        }
        bits
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Config, ConfigError> {
        let s = fs::read_to_string(path)?;
        Ok(Config::from_toml(&s)?)
    }

    pub fn from_toml(s: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

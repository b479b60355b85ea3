//! Configuration management for the Heist server.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use heist_common::DefenseSystem;
use heist_common::constants::{self, passwords};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// How often expired puzzles and idle sessions are swept
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Session cookie configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Puzzle vault configuration
    #[serde(default)]
    pub puzzle: PuzzleConfig,

    /// Economy and detection balancing
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Defender console configuration
    #[serde(default)]
    pub defense: DefenseConfig,
}

/// Session-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Idle session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,

    /// Mark the cookie `Secure` (HTTPS only)
    #[serde(default)]
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_secs: default_session_ttl(),
            secure: false,
        }
    }
}

/// Puzzle-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PuzzleConfig {
    /// Puzzle token validity in seconds
    #[serde(default = "default_puzzle_ttl")]
    pub ttl_secs: u64,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_puzzle_ttl(),
        }
    }
}

/// Economy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EconomyConfig {
    #[serde(default = "default_max_detection")]
    pub max_detection: u8,

    /// Black market ratio (GB per credit)
    #[serde(default = "default_gb_per_credit")]
    pub gb_per_credit: u64,

    #[serde(default = "default_reroll_cost")]
    pub reroll_cost: u64,

    #[serde(default = "default_cooldown_cost")]
    pub cooldown_cost: u64,

    /// GB lost (at most) when a failed hack fills detection
    #[serde(default = "default_trace_penalty")]
    pub trace_penalty_gb: u64,

    /// GB removed when a defender cancels a full detection
    #[serde(default = "default_cancel_penalty")]
    pub cancel_detection_penalty_gb: u64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            max_detection: default_max_detection(),
            gb_per_credit: default_gb_per_credit(),
            reroll_cost: default_reroll_cost(),
            cooldown_cost: default_cooldown_cost(),
            trace_penalty_gb: default_trace_penalty(),
            cancel_detection_penalty_gb: default_cancel_penalty(),
        }
    }
}

/// Defender console configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DefenseConfig {
    /// Hacks affected by one defense boost
    #[serde(default = "default_boost_hacks")]
    pub boost_hacks: u32,

    /// Haul multiplier while boosted
    #[serde(default = "default_boost_multiplier")]
    pub boost_multiplier: f64,

    #[serde(default)]
    pub passwords: DefensePasswords,
}

impl Default for DefenseConfig {
    fn default() -> Self {
        Self {
            boost_hacks: default_boost_hacks(),
            boost_multiplier: default_boost_multiplier(),
            passwords: DefensePasswords::default(),
        }
    }
}

/// Static password per defense
#[derive(Debug, Clone, Deserialize)]
pub struct DefensePasswords {
    #[serde(default = "default_wires_password")]
    pub wires: String,
    #[serde(default = "default_keypad_password")]
    pub keypad: String,
    #[serde(default = "default_firewall_password")]
    pub firewall: String,
}

impl DefensePasswords {
    pub fn for_system(&self, system: DefenseSystem) -> &str {
        match system {
            DefenseSystem::Wires => &self.wires,
            DefenseSystem::Keypad => &self.keypad,
            DefenseSystem::Firewall => &self.firewall,
        }
    }
}

impl Default for DefensePasswords {
    fn default() -> Self {
        Self {
            wires: default_wires_password(),
            keypad: default_keypad_password(),
            firewall: default_firewall_password(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String { constants::DEFAULT_LISTEN_ADDR.to_string() }
fn default_sweep_interval() -> u64 { constants::SWEEP_INTERVAL_SECS }
fn default_cookie_name() -> String { constants::SESSION_COOKIE.to_string() }
fn default_session_ttl() -> u64 { constants::SESSION_TTL_SECS }
fn default_puzzle_ttl() -> u64 { constants::PUZZLE_TTL_SECS }
fn default_max_detection() -> u8 { constants::DEFAULT_MAX_DETECTION }
fn default_gb_per_credit() -> u64 { constants::GB_PER_CREDIT }
fn default_reroll_cost() -> u64 { constants::REROLL_COST }
fn default_cooldown_cost() -> u64 { constants::COOLDOWN_COST }
fn default_trace_penalty() -> u64 { constants::TRACE_PENALTY_GB }
fn default_cancel_penalty() -> u64 { constants::CANCEL_DETECTION_PENALTY_GB }
fn default_boost_hacks() -> u32 { constants::BOOST_HACKS }
fn default_boost_multiplier() -> f64 { constants::BOOST_MULTIPLIER }
fn default_wires_password() -> String { passwords::WIRES.to_string() }
fn default_keypad_password() -> String { passwords::KEYPAD.to_string() }
fn default_firewall_password() -> String { passwords::FIREWALL.to_string() }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }

        if config.economy.gb_per_credit == 0 {
            anyhow::bail!("economy.gb_per_credit must be at least 1");
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            sweep_interval_secs: default_sweep_interval(),
            session: SessionConfig::default(),
            puzzle: PuzzleConfig::default(),
            economy: EconomyConfig::default(),
            defense: DefenseConfig::default(),
        }
    }
}

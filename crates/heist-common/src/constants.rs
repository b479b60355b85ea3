//! Shared constants for Data Heist components.

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";

/// Detection level at which the hackers are traced
pub const DEFAULT_MAX_DETECTION: u8 = 5;

/// Black market ratio: this many GB buy one credit
pub const GB_PER_CREDIT: u64 = 3;

/// Credits charged for rerolling the active puzzle
pub const REROLL_COST: u64 = 1;

/// Credits charged for lowering detection by one
pub const COOLDOWN_COST: u64 = 5;

/// Maximum GB lost when a failed hack fills detection
pub const TRACE_PENALTY_GB: u64 = 12;

/// GB removed from the hackers when a defender cancels a full detection
pub const CANCEL_DETECTION_PENALTY_GB: u64 = 100;

/// Number of hacks affected by one defense boost
pub const BOOST_HACKS: u32 = 8;

/// Haul multiplier while the defense boost is active
pub const BOOST_MULTIPLIER: f64 = 0.5;

/// Number of files stolen per successful hack
pub const FILES_PER_HAUL: usize = 2;

/// Haul size range used when the sampled files add up to nothing
pub const FALLBACK_HAUL_GB: std::ops::RangeInclusive<u64> = 10..=40;

/// Files that can be exfiltrated, with their size in GB
pub const FILE_POOL: &[(&str, u64)] = &[
    ("waf_rules.conf", 5),
    ("threat_intel.db", 7),
    ("packet_capture.pcap", 4),
    ("exfil.tar", 6),
    ("creds.csv", 3),
    ("ops_notes.md", 2),
];

/// Puzzle token expiry in the vault (1 hour)
pub const PUZZLE_TTL_SECS: u64 = 3600;

/// Idle session expiry (1 hour)
pub const SESSION_TTL_SECS: u64 = 3600;

/// How often expired puzzles and sessions are swept (seconds)
pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// Session cookie name
pub const SESSION_COOKIE: &str = "heist_session";

/// Default defender passwords, one per defense
pub mod passwords {
    pub const WIRES: &str = "-";
    pub const KEYPAD: &str = "124578";
    pub const FIREWALL: &str = "upgrade";
}

//! The shared game record and its rules.
//!
//! One `GameState` exists per process. Every route locks it for the whole
//! action so each rule below applies atomically.

mod haul;

pub use haul::{Haul, reduce_for_boost, sample_haul};

use heist_common::{DefenseLogs, DefenseSystem, Detection, HeistError, StateSnapshot};
use rand::Rng;

use crate::config::AppConfig;

/// Balancing numbers, taken from configuration at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    pub max_detection: u8,
    pub gb_per_credit: u64,
    pub reroll_cost: u64,
    pub cooldown_cost: u64,
    pub trace_penalty_gb: u64,
    pub cancel_detection_penalty_gb: u64,
    pub boost_hacks: u32,
    pub boost_multiplier: f64,
}

impl From<&AppConfig> for Rules {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_detection: config.economy.max_detection,
            gb_per_credit: config.economy.gb_per_credit.max(1),
            reroll_cost: config.economy.reroll_cost,
            cooldown_cost: config.economy.cooldown_cost,
            trace_penalty_gb: config.economy.trace_penalty_gb,
            cancel_detection_penalty_gb: config.economy.cancel_detection_penalty_gb,
            boost_hacks: config.defense.boost_hacks,
            boost_multiplier: config.defense.boost_multiplier,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// Outcome of a failed hack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure {
    /// GB removed because the failure filled detection
    pub traced_penalty: Option<u64>,
}

/// Outcome of a black market sale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sale {
    pub sold_gb: u64,
    pub gained_credits: u64,
}

/// Process-wide game record
#[derive(Debug, Clone)]
pub struct GameState {
    rules: Rules,
    detection: Detection,
    files: u64,
    credits: u64,
    boost_available: bool,
    boost_hacks_left: u32,
    logs: DefenseLogs,
}

impl GameState {
    pub fn new(rules: Rules) -> Self {
        Self {
            detection: Detection::new(rules.max_detection),
            rules,
            files: 0,
            credits: 0,
            boost_available: true,
            boost_hacks_left: 0,
            logs: DefenseLogs::default(),
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            detection: self.detection.value(),
            max_detection: self.detection.max(),
            files: self.files,
            credits: self.credits,
            boost_available: self.boost_available,
            boost_hacks_left: self.boost_hacks_left,
            logs: self.logs.clone(),
        }
    }

    pub fn logs(&self) -> &DefenseLogs {
        &self.logs
    }

    // === Hacker side ===

    /// Credit the haul of a correct answer against `system`
    pub fn record_success(&mut self, system: DefenseSystem, rng: &mut impl Rng) -> Haul {
        let mut haul = sample_haul(rng);
        if self.boost_hacks_left > 0 {
            haul.total_gb = reduce_for_boost(haul.total_gb, self.rules.boost_multiplier);
        }

        self.files += haul.total_gb;
        self.logs.get_mut(system).success += 1;

        tracing::info!(
            system = %system,
            gained_gb = haul.total_gb,
            boosted = self.boost_hacks_left > 0,
            "Hack succeeded"
        );

        haul
    }

    /// Record a wrong answer against `system`, raising detection
    pub fn record_failure(&mut self, system: DefenseSystem) -> Failure {
        self.logs.get_mut(system).fail += 1;

        let traced_penalty = if self.detection.raise() {
            let penalty = self.rules.trace_penalty_gb.min(self.files);
            self.files -= penalty;
            tracing::warn!(system = %system, penalty_gb = penalty, "Hackers traced");
            Some(penalty)
        } else {
            None
        };

        tracing::info!(
            system = %system,
            detection = self.detection.value(),
            "Hack failed"
        );

        Failure { traced_penalty }
    }

    /// Abandon the active hack. Costs one detection step.
    pub fn record_cancel(&mut self) {
        self.detection.raise();
        tracing::info!(detection = self.detection.value(), "Hack cancelled");
    }

    /// A resolved or cancelled hack uses up one boosted hack
    pub fn consume_boost_use(&mut self) {
        self.boost_hacks_left = self.boost_hacks_left.saturating_sub(1);
    }

    /// Pay for a reroll of the active puzzle
    pub fn pay_reroll(&mut self) -> Result<(), HeistError> {
        self.charge("Reroll", self.rules.reroll_cost)
    }

    /// Pay to lower detection by one
    pub fn cool_down(&mut self) -> Result<(), HeistError> {
        self.charge("Cool Down", self.rules.cooldown_cost)?;
        self.detection.lower();
        tracing::info!(detection = self.detection.value(), "System cooled");
        Ok(())
    }

    fn charge(&mut self, item: &'static str, cost: u64) -> Result<(), HeistError> {
        if self.credits < cost {
            return Err(HeistError::InsufficientCredits { item, cost });
        }
        self.credits -= cost;
        Ok(())
    }

    /// Exchange stolen GB for credits. Only full groups are sold.
    pub fn sell(&mut self, quantity_gb: i64) -> Result<Sale, HeistError> {
        if quantity_gb <= 0 {
            return Err(HeistError::InvalidAmount);
        }
        let quantity_gb = quantity_gb as u64;
        if quantity_gb > self.files {
            return Err(HeistError::InsufficientIntel);
        }

        let ratio = self.rules.gb_per_credit;
        let gained_credits = quantity_gb / ratio;
        if gained_credits == 0 {
            return Err(HeistError::BelowExchangeRate(ratio));
        }

        let sold_gb = gained_credits * ratio;
        self.files -= sold_gb;
        self.credits += gained_credits;

        tracing::info!(sold_gb, gained_credits, "Intel sold on the black market");

        Ok(Sale {
            sold_gb,
            gained_credits,
        })
    }

    // === Defender side ===

    /// One-shot defense boost; available again after a detection cancel
    pub fn boost_defense(&mut self) -> Result<u32, HeistError> {
        if !self.boost_available {
            return Err(HeistError::BoostUnavailable);
        }
        self.boost_available = false;
        self.boost_hacks_left = self.rules.boost_hacks;

        tracing::info!(hacks = self.boost_hacks_left, "Defense boosted");

        Ok(self.boost_hacks_left)
    }

    /// Reset a full detection meter, fining the hackers.
    ///
    /// Returns the penalty actually removed.
    pub fn cancel_detection(&mut self) -> Result<u64, HeistError> {
        if !self.detection.is_full() {
            return Err(HeistError::DetectionNotFull);
        }

        let penalty = self.rules.cancel_detection_penalty_gb.min(self.files);
        self.files -= penalty;
        self.detection.reset();
        self.boost_available = true;

        tracing::info!(penalty_gb = penalty, "Detection cancelled by defender");

        Ok(penalty)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

#[cfg(test)]
impl GameState {
    pub(crate) fn set_balances(&mut self, files: u64, credits: u64) {
        self.files = files;
        self.credits = credits;
    }

    pub(crate) fn fill_detection(&mut self) {
        while !self.detection.raise() {}
    }
}

//! Random outcome generation for round resolution.
//!
//! The resolver never touches an RNG directly; it asks an [`OutcomeSource`]
//! for each stochastic event. [`SeededOutcomes`] is the production source,
//! [`ScriptedOutcomes`] replays caller-chosen values.
use hmac::{Hmac, Mac};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::VecDeque;

use crate::catalog::{SupplierProfile, TransportProfile};
use crate::config::DemandRange;
use crate::constants::{STREAM_DAMAGE, STREAM_DEMAND, STREAM_DISRUPTION, STREAM_YIELD};

/// Source of the four independent draws a round needs.
pub trait OutcomeSource {
    /// Weighted choice over the supplier's yield outcomes.
    fn sample_yield(&mut self, profile: &SupplierProfile) -> f64;

    /// Bernoulli trial on the transporter's disruption probability.
    fn sample_disruption(&mut self, profile: &TransportProfile) -> bool;

    /// Bernoulli trial on the transporter's damage probability.
    fn sample_damage(&mut self, profile: &TransportProfile) -> bool;

    /// Uniform integer demand over the inclusive range.
    fn sample_demand(&mut self, range: DemandRange) -> u32;
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length; the fallback only exists to stay total.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Per-stream draw counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDraws {
    pub yield_draws: u64,
    pub disruption_draws: u64,
    pub damage_draws: u64,
    pub demand_draws: u64,
}

/// Production outcome source: one domain-separated RNG stream per event type,
/// all derived from a single user-visible seed.
#[derive(Debug, Clone)]
pub struct SeededOutcomes {
    seed: u64,
    yields: CountingRng<SmallRng>,
    disruption: CountingRng<SmallRng>,
    damage: CountingRng<SmallRng>,
    demand: CountingRng<SmallRng>,
}

impl SeededOutcomes {
    /// Construct the streams from a user-visible seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            yields: CountingRng::new(derive_stream_seed(seed, STREAM_YIELD)),
            disruption: CountingRng::new(derive_stream_seed(seed, STREAM_DISRUPTION)),
            damage: CountingRng::new(derive_stream_seed(seed, STREAM_DAMAGE)),
            demand: CountingRng::new(derive_stream_seed(seed, STREAM_DEMAND)),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn draws(&self) -> StreamDraws {
        StreamDraws {
            yield_draws: self.yields.draws(),
            disruption_draws: self.disruption.draws(),
            damage_draws: self.damage.draws(),
            demand_draws: self.demand.draws(),
        }
    }
}

impl OutcomeSource for SeededOutcomes {
    fn sample_yield(&mut self, profile: &SupplierProfile) -> f64 {
        let weights = profile.yield_outcomes.iter().map(|o| o.probability);
        match WeightedIndex::new(weights) {
            Ok(dist) => {
                let index = dist.sample(&mut self.yields);
                profile.yield_outcomes[index].fraction
            }
            // Validated catalogs always have positive weight.
            Err(_) => profile.yield_outcomes.first().map_or(1.0, |o| o.fraction),
        }
    }

    fn sample_disruption(&mut self, profile: &TransportProfile) -> bool {
        self.disruption
            .gen_bool(profile.disruption_probability.clamp(0.0, 1.0))
    }

    fn sample_damage(&mut self, profile: &TransportProfile) -> bool {
        self.damage
            .gen_bool(profile.damage_probability.clamp(0.0, 1.0))
    }

    fn sample_demand(&mut self, range: DemandRange) -> u32 {
        if range.min >= range.max {
            return range.min;
        }
        self.demand.gen_range(range.min..=range.max)
    }
}

/// One round's worth of scripted draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundDraws {
    pub yield_fraction: f64,
    pub disrupted: bool,
    pub damaged: bool,
    pub demand: u32,
}

impl Default for RoundDraws {
    fn default() -> Self {
        Self {
            yield_fraction: 1.0,
            disrupted: false,
            damaged: false,
            demand: 0,
        }
    }
}

/// Deterministic stub returning caller-specified values.
///
/// Each operation pops from its own queue; an empty queue falls back to the
/// configured [`RoundDraws`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedOutcomes {
    fallback: RoundDraws,
    yields: VecDeque<f64>,
    disruptions: VecDeque<bool>,
    damages: VecDeque<bool>,
    demands: VecDeque<u32>,
}

impl ScriptedOutcomes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source that returns the same draws every round.
    #[must_use]
    pub fn repeating(draws: RoundDraws) -> Self {
        Self {
            fallback: draws,
            ..Self::default()
        }
    }

    /// Source that plays back the given rounds in order, then repeats the
    /// default draws.
    #[must_use]
    pub fn from_rounds(rounds: impl IntoIterator<Item = RoundDraws>) -> Self {
        let mut scripted = Self::new();
        for round in rounds {
            scripted.push_round(round);
        }
        scripted
    }

    /// Queue one round of draws behind any already scripted.
    pub fn push_round(&mut self, draws: RoundDraws) {
        self.yields.push_back(draws.yield_fraction);
        self.disruptions.push_back(draws.disrupted);
        self.damages.push_back(draws.damaged);
        self.demands.push_back(draws.demand);
    }

    /// Rounds still queued for the demand draw.
    #[must_use]
    pub fn pending_rounds(&self) -> usize {
        self.demands.len()
    }
}

impl OutcomeSource for ScriptedOutcomes {
    fn sample_yield(&mut self, _profile: &SupplierProfile) -> f64 {
        self.yields
            .pop_front()
            .unwrap_or(self.fallback.yield_fraction)
    }

    fn sample_disruption(&mut self, _profile: &TransportProfile) -> bool {
        self.disruptions
            .pop_front()
            .unwrap_or(self.fallback.disrupted)
    }

    fn sample_damage(&mut self, _profile: &TransportProfile) -> bool {
        self.damages.pop_front().unwrap_or(self.fallback.damaged)
    }

    fn sample_demand(&mut self, _range: DemandRange) -> u32 {
        self.demands.pop_front().unwrap_or(self.fallback.demand)
    }
}

use std::collections::HashMap;
use std::convert::TryFrom;

use supplychain_game::{Catalog, DemandRange, OutcomeSource, SeededOutcomes};

const SAMPLE_SIZE: usize = 5000;
const TOLERANCE: f64 = 0.025;

fn rate(count: usize) -> f64 {
    let count = u32::try_from(count).expect("count fits");
    let total = u32::try_from(SAMPLE_SIZE).expect("sample size fits u32");
    f64::from(count) / f64::from(total)
}

#[test]
fn yield_distribution_matches_supplier_weights() {
    let catalog = Catalog::standard();
    let gamma = catalog.supplier("gamma").expect("gamma supplier");
    let mut outcomes = SeededOutcomes::from_seed(1234);

    let mut counts: HashMap<u64, usize> = HashMap::new();
    for _ in 0..SAMPLE_SIZE {
        *counts
            .entry(outcomes.sample_yield(gamma).to_bits())
            .or_default() += 1;
    }
    for outcome in &gamma.yield_outcomes {
        let observed = rate(counts.get(&outcome.fraction.to_bits()).copied().unwrap_or(0));
        assert!(
            (observed - outcome.probability).abs() <= TOLERANCE,
            "yield {} drifted: observed {observed:.4}, expected {}",
            outcome.fraction,
            outcome.probability
        );
    }
}

#[test]
fn transport_events_track_profile_rates() {
    let catalog = Catalog::standard();
    for transporter in catalog.transporters() {
        let mut outcomes = SeededOutcomes::from_seed(0x00C0_FFEE);
        let disruptions = (0..SAMPLE_SIZE)
            .filter(|_| outcomes.sample_disruption(transporter))
            .count();
        let damages = (0..SAMPLE_SIZE)
            .filter(|_| outcomes.sample_damage(transporter))
            .count();
        assert!(
            (rate(disruptions) - transporter.disruption_probability).abs() <= TOLERANCE,
            "{} disruption rate drifted: {:.4}",
            transporter.id,
            rate(disruptions)
        );
        assert!(
            (rate(damages) - transporter.damage_probability).abs() <= TOLERANCE,
            "{} damage rate drifted: {:.4}",
            transporter.id,
            rate(damages)
        );
    }
}

#[test]
fn demand_is_uniform_over_inclusive_range() {
    let range = DemandRange::new(80, 220);
    let mut outcomes = SeededOutcomes::from_seed(42);
    let samples: Vec<u32> = (0..SAMPLE_SIZE)
        .map(|_| outcomes.sample_demand(range))
        .collect();

    assert!(samples.iter().all(|&d| range.contains(d)));
    assert!(samples.contains(&80), "lower bound never drawn");
    assert!(samples.contains(&220), "upper bound never drawn");

    let total: u64 = samples.iter().map(|&d| u64::from(d)).sum();
    let mean = f64::from(u32::try_from(total).expect("sum fits")) / SAMPLE_SIZE as f64;
    assert!((mean - 150.0).abs() < 3.0, "demand mean drifted: {mean:.2}");
}

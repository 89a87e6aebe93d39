//! Weighted selection over the pool registry
//!
//! Each non-empty category gets `floor(weight * TICKET_RESOLUTION)` tickets.
//! A category is chosen uniformly over all tickets (cumulative sums plus a
//! binary search), then a value is chosen uniformly from its pending numbers.
//!
//! Weighting is per category, not per remaining value: a category keeps its
//! full ticket count down to its last pending number.

use rand::Rng;

use super::category::Draw;
use super::registry::{Pool, PoolRegistry};

/// Tickets per unit of weight. Weights resolve to 1/1000.
pub const TICKET_RESOLUTION: u32 = 1_000;

/// Number of tickets a weight is worth
pub fn tickets_for(weight: f64) -> u64 {
    if weight <= 0.0 || !weight.is_finite() {
        return 0;
    }
    (weight * f64::from(TICKET_RESOLUTION)).floor() as u64
}

/// Picks candidates from a registry according to category weights
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedSelector;

impl WeightedSelector {
    pub fn new() -> Self {
        Self
    }

    /// Picks a pending `(category, value)`, or `None` when nothing is selectable
    pub fn pick<R: Rng + ?Sized>(&self, registry: &PoolRegistry, rng: &mut R) -> Option<Draw> {
        let (pools, cumulative) = Self::ticket_table(registry);
        let total = *cumulative.last()?;
        if total == 0 {
            return None;
        }

        let ticket = rng.gen_range(0..total);
        // First entry whose running total exceeds the ticket
        let index = cumulative.partition_point(|&upper| upper <= ticket);
        let pool = pools.get(index)?;

        let pending = pool.pending();
        let number = pending[rng.gen_range(0..pending.len())];

        Some(Draw {
            category: pool.id().clone(),
            value: pool.category().value(number),
        })
    }

    /// Non-empty pools with tickets, alongside their running ticket totals
    fn ticket_table(registry: &PoolRegistry) -> (Vec<&Pool>, Vec<u64>) {
        let mut pools = Vec::new();
        let mut cumulative = Vec::new();
        let mut running = 0u64;

        for pool in registry.non_empty_categories() {
            let tickets = tickets_for(pool.category().weight());
            if tickets == 0 {
                continue;
            }
            // Validated weights keep the total far below the limit
            running = running.saturating_add(tickets);
            pools.push(pool);
            cumulative.push(running);
        }

        (pools, cumulative)
    }

    /// Probability of each category being chosen on the next pick
    pub fn shares<'a>(&self, registry: &'a PoolRegistry) -> Vec<(&'a Pool, f64)> {
        let (pools, cumulative) = Self::ticket_table(registry);
        let total = cumulative.last().copied().unwrap_or(0);
        if total == 0 {
            return Vec::new();
        }

        let mut previous = 0u64;
        pools
            .into_iter()
            .zip(cumulative)
            .map(|(pool, upper)| {
                let tickets = upper - previous;
                previous = upper;
                (pool, tickets as f64 / total as f64)
            })
            .collect()
    }
}

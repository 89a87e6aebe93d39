//! Pool overview command

use anyhow::Result;

use super::output::Output;
use crate::domain::{tickets_for, PoolRegistry, WeightedSelector};
use crate::storage::Config;

/// Show configured pools with their weights and selection shares
pub fn run(output: &Output, config: &Config) -> Result<()> {
    let registry = PoolRegistry::initialize(&config.draw.categories)?;
    let shares = WeightedSelector::new().shares(&registry);
    output.verbose_ctx("pools", &format!("{} categories configured", registry.pools().len()));

    let share_of = |id: &crate::domain::CategoryId| {
        shares
            .iter()
            .find(|(pool, _)| pool.id() == id)
            .map(|(_, share)| *share)
            .unwrap_or(0.0)
    };

    if output.is_json() {
        let items: Vec<_> = registry
            .pools()
            .iter()
            .map(|pool| {
                let category = pool.category();
                serde_json::json!({
                    "id": category.id(),
                    "count": category.count(),
                    "weight": category.weight(),
                    "tickets": tickets_for(category.weight()),
                    "share": share_of(category.id()),
                    "suffix": category.suffix(),
                    "color": category.color(),
                })
            })
            .collect();
        output.data(&items);
    } else {
        println!(
            "{:<16} {:>8} {:>8} {:>8} {:>7}  SAMPLE",
            "CATEGORY", "COUNT", "WEIGHT", "TICKETS", "SHARE"
        );
        println!("{}", "-".repeat(64));
        for pool in registry.pools() {
            let category = pool.category();
            println!(
                "{:<16} {:>8} {:>8} {:>8} {:>6.1}%  {}..{}",
                category.id(),
                category.count(),
                category.weight(),
                tickets_for(category.weight()),
                share_of(category.id()) * 100.0,
                category.value(1),
                category.value(category.count()),
            );
        }
        println!();
        println!(
            "{} numbers in total, {} ms per preview tick",
            registry.remaining(),
            config.draw.tick_ms
        );
    }

    Ok(())
}

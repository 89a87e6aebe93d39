//! Pool registry
//!
//! Holds one pool of pending numbers per category, in configuration order.
//! Pools only shrink; restoring them means building a fresh registry.

use thiserror::Error;

use super::category::{Category, CategoryId, CategorySpec, ConfigError};

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Value {value} is not pending in category {category}")]
    NotFound { category: CategoryId, value: u32 },
}

/// A category together with its pending numbers
#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    category: Category,
    pending: Vec<u32>,
}

impl Pool {
    fn new(category: Category) -> Self {
        let pending = (1..=category.count()).collect();
        Self { category, pending }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn id(&self) -> &CategoryId {
        self.category.id()
    }

    /// Pending numbers in their original order
    pub fn pending(&self) -> &[u32] {
        &self.pending
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Registry of disjoint number pools
#[derive(Debug, Clone, PartialEq)]
pub struct PoolRegistry {
    pools: Vec<Pool>,
}

impl PoolRegistry {
    /// Builds the registry from configuration, or fails without building anything
    pub fn initialize(specs: &[CategorySpec]) -> Result<Self, ConfigError> {
        let categories = Category::from_specs(specs)?;
        Ok(Self::from_categories(categories))
    }

    /// Builds the registry from already validated categories
    pub fn from_categories(categories: Vec<Category>) -> Self {
        Self {
            pools: categories.into_iter().map(Pool::new).collect(),
        }
    }

    /// Removes a number from a category's pending sequence
    pub fn remove(&mut self, category: &CategoryId, number: u32) -> Result<(), RegistryError> {
        let not_found = || RegistryError::NotFound {
            category: category.clone(),
            value: number,
        };

        let pool = self
            .pools
            .iter_mut()
            .find(|p| p.id() == category)
            .ok_or_else(not_found)?;

        let position = pool
            .pending
            .iter()
            .position(|&n| n == number)
            .ok_or_else(not_found)?;

        pool.pending.remove(position);
        Ok(())
    }

    /// True when every pool is empty
    pub fn is_exhausted(&self) -> bool {
        self.pools.iter().all(Pool::is_empty)
    }

    /// Pools that still have at least one pending number
    pub fn non_empty_categories(&self) -> impl Iterator<Item = &Pool> + '_ {
        self.pools.iter().filter(|p| !p.is_empty())
    }

    /// All pools in configuration order
    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.pools.iter().map(Pool::category)
    }

    pub fn get(&self, category: &CategoryId) -> Option<&Pool> {
        self.pools.iter().find(|p| p.id() == category)
    }

    pub fn pending(&self, category: &CategoryId) -> Option<&[u32]> {
        self.get(category).map(Pool::pending)
    }

    /// Total pending numbers across all pools
    pub fn remaining(&self) -> usize {
        self.pools.iter().map(Pool::remaining).sum()
    }
}

//! Progression store: coin balance, cosmetic sets and per-level records
//!
//! Every mutation is written to the backend first and mirrored in memory only
//! after the write succeeded. Affordability checks read the backend, never a
//! cached balance.

pub mod cosmetics;

use serde::Serialize;

use crate::error::PersistenceError;
use crate::persistence::{ProgressBackend, SetRow, StatisticsRow};
use crate::sim::GameEvent;

pub use cosmetics::{CATALOG, CosmeticSet, DEFAULT_SET, find_set};

/// Outcome of a purchase attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PurchaseResult {
    Ok,
    InsufficientFunds,
    AlreadyOwned,
    UnknownSet,
}

/// Outcome of a selection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectResult {
    Ok,
    NotOwned,
    UnknownSet,
}

/// Ownership view of one catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetStatus {
    pub set: &'static CosmeticSet,
    pub owned: bool,
    pub cost: u64,
    pub selected: bool,
}

/// Persistent economy state, injected into the session and menus
#[derive(Debug)]
pub struct ProgressionStore<B: ProgressBackend> {
    backend: B,
    balance: u64,
    selected: &'static CosmeticSet,
}

impl<B: ProgressBackend> ProgressionStore<B> {
    /// Load from `backend`, seeding any missing `Sets` rows from the catalog
    pub fn load(mut backend: B) -> Result<Self, PersistenceError> {
        for set in &CATALOG {
            if backend.set_row(set.id)?.is_none() {
                backend.put_set_row(
                    set.id,
                    SetRow {
                        is_bought: set.owned_by_default,
                        cost: set.price,
                    },
                )?;
            }
        }
        let balance = backend.balance()?;
        log::info!("Progression loaded: {balance} coins");

        Ok(Self {
            backend,
            balance,
            selected: &CATALOG[0],
        })
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Adjust the balance, saturating at zero. Returns the new balance.
    pub fn add_currency(&mut self, delta: i64) -> Result<u64, PersistenceError> {
        let current = self.backend.balance()?;
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs())
        };
        self.backend.set_balance(next)?;
        self.balance = next;
        Ok(next)
    }

    /// Make sure `level` has a statistics row; returns the stored record
    pub fn begin_level(&mut self, level: &str) -> Result<StatisticsRow, PersistenceError> {
        self.backend.insert_statistics_if_absent(level, StatisticsRow::default())
    }

    pub fn level_record(&self, level: &str) -> Result<Option<StatisticsRow>, PersistenceError> {
        self.backend.statistics_row(level)
    }

    /// Fold an attempt into the level's best record.
    ///
    /// Score and coin bests are compared independently and each is raised
    /// when the attempt beat it.
    pub fn record_level_outcome(
        &mut self,
        level: &str,
        score: u64,
        currency_collected: u32,
    ) -> Result<StatisticsRow, PersistenceError> {
        let attempt = StatisticsRow {
            points: score,
            max_coins: currency_collected,
        };
        let Some(best) = self.backend.statistics_row(level)? else {
            self.backend.put_statistics_row(level, attempt)?;
            return Ok(attempt);
        };

        let updated = StatisticsRow {
            points: best.points.max(score),
            max_coins: best.max_coins.max(currency_collected),
        };
        if updated != best {
            self.backend.put_statistics_row(level, updated)?;
            log::info!(
                "New best on '{level}': {} points, {} coins",
                updated.points,
                updated.max_coins
            );
        }
        Ok(updated)
    }

    /// Feed a terminal event into the store. A win banks the coins collected
    /// and updates the record; a loss only updates the record.
    pub fn apply_outcome(&mut self, event: &GameEvent) -> Result<(), PersistenceError> {
        match event {
            GameEvent::LevelWon {
                level_id,
                score,
                currency_collected,
            } => {
                self.add_currency(i64::from(*currency_collected))?;
                self.record_level_outcome(level_id, *score, *currency_collected)?;
            }
            GameEvent::LevelLost {
                level_id,
                score,
                currency_collected,
                ..
            } => {
                self.record_level_outcome(level_id, *score, *currency_collected)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Buy a cosmetic set
    pub fn purchase_set(&mut self, id: &str) -> Result<PurchaseResult, PersistenceError> {
        let Some(set) = find_set(id) else {
            return Ok(PurchaseResult::UnknownSet);
        };
        let row = self.backend.set_row(set.id)?.unwrap_or(SetRow {
            is_bought: set.owned_by_default,
            cost: set.price,
        });
        if row.is_bought {
            return Ok(PurchaseResult::AlreadyOwned);
        }

        let balance = self.backend.balance()?;
        if balance < row.cost {
            log::info!("Cannot afford '{id}': {balance} < {}", row.cost);
            return Ok(PurchaseResult::InsufficientFunds);
        }

        self.backend.put_set_row(
            set.id,
            SetRow {
                is_bought: true,
                ..row
            },
        )?;
        let remaining = balance - row.cost;
        if let Err(err) = self.backend.set_balance(remaining) {
            // Unpaid: put the set back on the shelf
            if let Err(restore) = self.backend.put_set_row(set.id, row) {
                log::error!("Could not roll back '{id}' after failed charge: {restore}");
            }
            return Err(err);
        }
        self.balance = remaining;
        log::info!("Bought '{id}' for {} coins, {remaining} left", row.cost);
        Ok(PurchaseResult::Ok)
    }

    /// Choose the set to play with. Kept in memory only.
    pub fn select_set(&mut self, id: &str) -> Result<SelectResult, PersistenceError> {
        let Some(set) = find_set(id) else {
            return Ok(SelectResult::UnknownSet);
        };
        let owned = self.backend.set_row(set.id)?.is_some_and(|r| r.is_bought);
        if !owned {
            return Ok(SelectResult::NotOwned);
        }
        self.selected = set;
        Ok(SelectResult::Ok)
    }

    pub fn selected_set(&self) -> &'static CosmeticSet {
        self.selected
    }

    /// Catalog with ownership, in shop order
    pub fn sets(&self) -> Result<Vec<SetStatus>, PersistenceError> {
        let rows = self.backend.set_rows()?;
        Ok(CATALOG
            .iter()
            .map(|set| {
                let row = rows.iter().find(|(name, _)| name == set.id).map(|(_, r)| *r);
                SetStatus {
                    set,
                    owned: row.is_some_and(|r| r.is_bought),
                    cost: row.map_or(set.price, |r| r.cost),
                    selected: set.id == self.selected.id,
                }
            })
            .collect())
    }

    /// Every level record, ordered by level id
    pub fn statistics(&self) -> Result<Vec<(String, StatisticsRow)>, PersistenceError> {
        self.backend.statistics_rows()
    }
}

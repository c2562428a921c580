//! Sabotage Token Bank
//!
//! A racer's spendable sabotage currency. Tokens come in one at a time from
//! gold completions and go out one at a time through the sabotage
//! dispatcher. The balance can never go negative: a debit the balance
//! cannot cover fails without mutating anything.

use serde::{Deserialize, Serialize};

/// Token balance plus lifetime counters for the end-of-race summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBank {
    balance: u32,
    earned: u32,
    spent: u32,
}

impl TokenBank {
    /// Empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens currently spendable.
    pub fn balance(&self) -> u32 {
        self.balance
    }

    /// Tokens credited over the whole race.
    pub fn lifetime_earned(&self) -> u32 {
        self.earned
    }

    /// Tokens debited over the whole race.
    pub fn lifetime_spent(&self) -> u32 {
        self.spent
    }

    /// Credit `amount` tokens. Zero is a no-op. Returns the new balance.
    pub fn add(&mut self, amount: u32) -> u32 {
        if amount > 0 {
            self.balance = self.balance.saturating_add(amount);
            self.earned = self.earned.saturating_add(amount);
        }
        self.balance
    }

    /// Debit `amount` tokens. Fails without mutation when the balance is
    /// short; zero succeeds trivially. Returns whether the debit happened.
    pub fn spend(&mut self, amount: u32) -> bool {
        if amount == 0 {
            return true;
        }
        match self.balance.checked_sub(amount) {
            Some(rest) => {
                self.balance = rest;
                self.spent = self.spent.saturating_add(amount);
                true
            }
            None => false,
        }
    }
}

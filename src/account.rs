use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::credential::CredentialDigest;

/// Operation on whose behalf a balance change is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceAction {
    Deposit,
    Transfer,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AccountEventKind {
    Credited,
    Debited,
}

#[derive(Debug)]
pub struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
}

impl AccountEvent {
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> &AccountEventKind {
        &self.kind
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("{action:?} amount must be positive")]
    InvalidAmount { action: BalanceAction },
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Balance limit exceeded")]
    BalanceOverflow,
}

#[derive(Debug)]
pub struct Account {
    credential: CredentialDigest,
    balance: Decimal,
}

impl Account {
    pub fn new(pin: &str, balance: Decimal) -> Self {
        Self {
            credential: CredentialDigest::compute(pin),
            balance,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn verify_pin(&self, supplied_pin: &str) -> bool {
        self.credential.verify(supplied_pin)
    }

    pub fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Credited => {
                self.balance += event.amount;
            }
            AccountEventKind::Debited => {
                self.balance -= event.amount;
            }
        }
    }

    pub fn handle_credit(
        &self,
        action: BalanceAction,
        amount: Decimal,
    ) -> Result<AccountEvent, AccountError> {
        if amount <= Decimal::zero() {
            return Err(AccountError::InvalidAmount { action });
        }
        if self.balance.checked_add(amount).is_none() {
            return Err(AccountError::BalanceOverflow);
        }
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Credited,
        })
    }

    /// Debits are only produced by transfers, and never take the balance below zero.
    pub fn handle_debit(&self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        if amount <= Decimal::zero() {
            return Err(AccountError::InvalidAmount {
                action: BalanceAction::Transfer,
            });
        }
        if self.balance < amount {
            return Err(AccountError::InsufficientFunds);
        }
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Debited,
        })
    }
}

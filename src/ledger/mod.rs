use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::{AccountError, BalanceAction};

pub mod in_memory_ledger;

/// Case-sensitive account name.
pub type AccountId = String;

/// Which side of an operation referenced an unknown account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Account,
    Sender,
    Recipient,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Party::Account => "User",
            Party::Sender => "Sender",
            Party::Recipient => "Recipient",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{party} not found")]
    AccountNotFound { party: Party },
    /// Unknown account and wrong PIN are deliberately the same error.
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("{action:?} amount must be positive")]
    InvalidAmount { action: BalanceAction },
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Balance limit exceeded")]
    BalanceOverflow,
    #[error("Cannot transfer to yourself")]
    SelfTransferNotAllowed,
    #[error("Account `{0}` already exists")]
    DuplicateAccount(AccountId),
}

impl From<AccountError> for LedgerError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidAmount { action } => LedgerError::InvalidAmount { action },
            AccountError::InsufficientFunds => LedgerError::InsufficientFunds,
            AccountError::BalanceOverflow => LedgerError::BalanceOverflow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub identifier: AccountId,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub sender_balance: Decimal,
    pub recipient_balance: Decimal,
}

/// The operations an adapter may invoke on a ledger.
///
/// All methods take `&self`: implementations are shared between concurrent
/// callers and serialize access to each account internally.
pub trait Ledger: Send + Sync {
    /// Registers a new account. Bootstrap only, never reachable from the network.
    fn seed(
        &self,
        identifier: &str,
        pin: &str,
        initial_balance: Decimal,
    ) -> Result<(), LedgerError>;

    fn authenticate(&self, identifier: &str, pin: &str) -> Result<AccountSnapshot, LedgerError>;

    /// Credits an account. Requires no credentials.
    fn deposit(&self, identifier: &str, amount: Decimal) -> Result<Decimal, LedgerError>;

    /// Moves `amount` from sender to recipient as a single step.
    ///
    /// Checks run in a fixed order: sender exists, recipient exists, sender and
    /// recipient differ, sender PIN, positive amount, sufficient funds.
    fn transfer(
        &self,
        sender_id: &str,
        sender_pin: &str,
        recipient_id: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, LedgerError>;

    fn balance(&self, identifier: &str) -> Result<Decimal, LedgerError>;

    /// Sum of every balance, or `BalanceOverflow` if it does not fit a `Decimal`.
    fn total_balance(&self) -> Result<Decimal, LedgerError>;
}

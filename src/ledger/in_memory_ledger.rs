use std::{
    collections::{HashMap, hash_map::Entry},
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock},
};

use rust_decimal::Decimal;

use crate::account::{Account, BalanceAction};

use super::{AccountId, AccountSnapshot, Ledger, LedgerError, Party, TransferReceipt};

type AccountCell = Arc<Mutex<Account>>;

/// Volatile ledger with one lock per account.
///
/// The map lock is only held to find or insert an account, so operations on
/// different accounts never wait on each other. Whenever more than one account
/// lock is held, they are acquired in identifier order.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: RwLock<HashMap<AccountId, AccountCell>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, identifier: &str) -> Option<AccountCell> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned()
    }
}

// Balances are written only after all checks pass, so a poisoned lock never
// guards a half-applied change.
fn lock(cell: &AccountCell) -> MutexGuard<'_, Account> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Ledger for InMemoryLedger {
    fn seed(
        &self,
        identifier: &str,
        pin: &str,
        initial_balance: Decimal,
    ) -> Result<(), LedgerError> {
        let mut accounts = self
            .accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Entry::Vacant(entry) = accounts.entry(identifier.to_owned()) else {
            return Err(LedgerError::DuplicateAccount(identifier.to_owned()));
        };
        entry.insert(Arc::new(Mutex::new(Account::new(pin, initial_balance))));
        Ok(())
    }

    fn authenticate(&self, identifier: &str, pin: &str) -> Result<AccountSnapshot, LedgerError> {
        let cell = self
            .lookup(identifier)
            .ok_or(LedgerError::InvalidCredentials)?;
        let acc = lock(&cell);
        if !acc.verify_pin(pin) {
            return Err(LedgerError::InvalidCredentials);
        }
        Ok(AccountSnapshot {
            identifier: identifier.to_owned(),
            balance: acc.balance(),
        })
    }

    fn deposit(&self, identifier: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        let cell = self.lookup(identifier).ok_or(LedgerError::AccountNotFound {
            party: Party::Account,
        })?;
        let mut acc = lock(&cell);
        let evt = acc.handle_credit(BalanceAction::Deposit, amount)?;
        acc.apply(&evt);
        Ok(acc.balance())
    }

    fn transfer(
        &self,
        sender_id: &str,
        sender_pin: &str,
        recipient_id: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, LedgerError> {
        let sender = self.lookup(sender_id).ok_or(LedgerError::AccountNotFound {
            party: Party::Sender,
        })?;
        let recipient = self
            .lookup(recipient_id)
            .ok_or(LedgerError::AccountNotFound {
                party: Party::Recipient,
            })?;
        if sender_id == recipient_id {
            return Err(LedgerError::SelfTransferNotAllowed);
        }

        let (mut sender_acc, mut recipient_acc) = if sender_id < recipient_id {
            let sender_acc = lock(&sender);
            (sender_acc, lock(&recipient))
        } else {
            let recipient_acc = lock(&recipient);
            (lock(&sender), recipient_acc)
        };

        if !sender_acc.verify_pin(sender_pin) {
            return Err(LedgerError::InvalidCredentials);
        }
        let debit = sender_acc.handle_debit(amount)?;
        let credit = recipient_acc.handle_credit(BalanceAction::Transfer, amount)?;
        // both legs are validated, and applied while both locks are held
        sender_acc.apply(&debit);
        recipient_acc.apply(&credit);

        Ok(TransferReceipt {
            sender_balance: sender_acc.balance(),
            recipient_balance: recipient_acc.balance(),
        })
    }

    fn balance(&self, identifier: &str) -> Result<Decimal, LedgerError> {
        let cell = self.lookup(identifier).ok_or(LedgerError::AccountNotFound {
            party: Party::Account,
        })?;
        let balance = lock(&cell).balance();
        Ok(balance)
    }

    fn total_balance(&self) -> Result<Decimal, LedgerError> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        let mut cells: Vec<_> = accounts.iter().collect();
        cells.sort_by(|(a, _), (b, _)| a.cmp(b));
        // hold every lock at once so no transfer is observed half-way
        let guards: Vec<_> = cells.into_iter().map(|(_, cell)| lock(cell)).collect();
        guards
            .iter()
            .try_fold(Decimal::ZERO, |total, acc| total.checked_add(acc.balance()))
            .ok_or(LedgerError::BalanceOverflow)
    }
}

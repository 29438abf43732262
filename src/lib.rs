/// Account record and balance arithmetic.
/// State is modified using events, which are created by handling credit/debit requests
pub mod account;

/// PIN digests, so raw PINs are never stored.
pub mod credential;

/// Ledger interface and error taxonomy, plus "in memory" implementation.
/// Owns every account and is the only place balances are mutated.
pub mod ledger;

/// Bootstraps the ledger as an HTTP service: configuration, seed data, routes
/// and logging. Lives in the library so integration tests can reach it.
pub mod service;

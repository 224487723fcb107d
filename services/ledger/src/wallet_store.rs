//! Wallet store with optimistic versioning
//!
//! Every mutation reads the current wallet snapshot, applies the
//! change, and commits with a compare-and-set on the version. Losers
//! retry from the top with a bounded attempt budget; there are no
//! blocking row locks, so there are no deadlocks. Balance movements
//! for a given (user, currency) pair are serialized by the version
//! CAS.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;
use types::currency::Currency;
use types::errors::ExchangeError;
use types::ids::UserId;
use types::wallet::Wallet;

/// CAS retry budget per mutation
pub const MAX_CAS_ATTEMPTS: u32 = 5;

/// Concurrent user → currency → balance store
#[derive(Debug, Default)]
pub struct WalletStore {
    wallets: DashMap<(UserId, Currency), Wallet>,
}

impl WalletStore {
    pub fn new() -> Self {
        Self {
            wallets: DashMap::new(),
        }
    }

    /// Current snapshot of one wallet
    pub fn get(&self, user_id: UserId, currency: Currency) -> Option<Wallet> {
        self.wallets.get(&(user_id, currency)).map(|w| w.clone())
    }

    /// All wallets of a user, in currency order
    pub fn list(&self, user_id: UserId) -> Vec<Wallet> {
        let mut wallets: Vec<Wallet> = self
            .wallets
            .iter()
            .filter(|entry| entry.key().0 == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        wallets.sort_by_key(|w| w.currency.as_str());
        wallets
    }

    /// Add to a balance, creating the wallet at zero if absent
    ///
    /// Returns the committed wallet snapshot.
    pub fn credit(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
        timestamp: i64,
    ) -> Result<Wallet, ExchangeError> {
        // Lazy wallet creation on first credit; wallets are never destroyed
        self.wallets
            .entry((user_id, currency))
            .or_insert_with(|| Wallet::empty(user_id, currency, timestamp));

        self.mutate(user_id, currency, timestamp, |wallet| wallet.credit(amount))
    }

    /// Subtract from a balance
    ///
    /// Fails with INSUFFICIENT_BALANCE when the balance is below the
    /// amount, or NOT_FOUND when no wallet exists for the pair.
    pub fn debit(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
        timestamp: i64,
    ) -> Result<Wallet, ExchangeError> {
        self.mutate(user_id, currency, timestamp, |wallet| wallet.debit(amount))
    }

    /// CAS mutation loop
    fn mutate<F>(
        &self,
        user_id: UserId,
        currency: Currency,
        timestamp: i64,
        op: F,
    ) -> Result<Wallet, ExchangeError>
    where
        F: Fn(&mut Wallet) -> Result<(), ExchangeError>,
    {
        let key = (user_id, currency);
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let mut candidate = match self.wallets.get(&key) {
                Some(wallet) => wallet.clone(),
                None => {
                    return Err(ExchangeError::NotFound {
                        entity: "wallet",
                        id: format!("{}:{}", user_id, currency),
                    })
                }
            };
            let expected_version = candidate.version;

            op(&mut candidate)?;
            candidate.version = expected_version + 1;
            candidate.updated_at = timestamp;

            if self.commit_if_version(key, expected_version, candidate.clone()) {
                return Ok(candidate);
            }
            debug!(
                user = %user_id,
                %currency,
                attempt,
                "Wallet version conflict, retrying"
            );
        }
        Err(ExchangeError::ConcurrencyConflict {
            attempts: MAX_CAS_ATTEMPTS,
        })
    }

    /// Commit the candidate only if the stored version is unchanged
    fn commit_if_version(
        &self,
        key: (UserId, Currency),
        expected_version: u64,
        candidate: Wallet,
    ) -> bool {
        match self.wallets.entry(key) {
            Entry::Occupied(mut occupied) if occupied.get().version == expected_version => {
                occupied.insert(candidate);
                true
            }
            _ => false,
        }
    }
}

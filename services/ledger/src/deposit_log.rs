//! Deposit idempotency log
//!
//! Records deposit idempotency keys so a retried deposit credits at
//! most once, with the same discipline as order keys.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use types::errors::ExchangeError;

/// At-most-once record of accepted deposit keys
#[derive(Debug, Default)]
pub struct DepositLog {
    keys: DashMap<String, ()>,
}

impl DepositLog {
    pub fn new() -> Self {
        Self {
            keys: DashMap::new(),
        }
    }

    /// Claim a key; fails with DUPLICATE when already claimed
    pub fn record(&self, key: &str) -> Result<(), ExchangeError> {
        match self.keys.entry(key.to_string()) {
            Entry::Occupied(_) => Err(ExchangeError::Duplicate {
                key: key.to_string(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_record_is_duplicate() {
        let log = DepositLog::new();
        log.record("dep-1").unwrap();

        let err = log.record("dep-1").unwrap_err();
        assert!(matches!(err, ExchangeError::Duplicate { .. }));

        // Different key still accepted
        log.record("dep-2").unwrap();
    }
}

//! Ledger service
//!
//! Persistent stores for the exchange core: wallets with optimistic
//! versioning, order records keyed by id and idempotency key, the
//! append-only trade log, and the deposit idempotency log.
//!
//! Stores are in-memory but keep database discipline: wallet mutations
//! are version compare-and-set with bounded retry, idempotency keys
//! are unique across all orders, and trades are immutable once
//! written.

pub mod deposit_log;
pub mod order_store;
pub mod trade_store;
pub mod wallet_store;

pub use deposit_log::DepositLog;
pub use order_store::OrderStore;
pub use trade_store::TradeStore;
pub use wallet_store::WalletStore;

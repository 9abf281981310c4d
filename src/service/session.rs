use tokio::sync::{Mutex, MutexGuard};

use crate::domain::product::AccountAddress;
use crate::error::MarketError;
use crate::gateway::authorization::auth_error;
use crate::wallet::WalletProvider;

// ============================================================================
// Session - Acting Identity and In-Flight Discipline
// ============================================================================

/// One connected wallet identity driving operations. The session owns the
/// single-in-flight gate: mutating operations serialize on it, so a second
/// mutation issued while one is unresolved queues behind it and then
/// re-checks its preconditions against the latest state.
#[derive(Debug)]
pub struct Session {
    account: AccountAddress,
    gate: Mutex<()>,
}

impl Session {
    pub fn new(account: AccountAddress) -> Self {
        Self {
            account,
            gate: Mutex::new(()),
        }
    }

    /// Connect through the wallet provider; the first exposed account becomes
    /// the acting identity.
    pub async fn connect<W: WalletProvider>(provider: &W) -> Result<Self, MarketError> {
        let accounts = provider.request_accounts().await.map_err(auth_error)?;
        let account = accounts
            .into_iter()
            .next()
            .ok_or(MarketError::WalletUnavailable)?;

        tracing::info!(account = %account, "Wallet connected");
        Ok(Self::new(account))
    }

    pub fn account(&self) -> &AccountAddress {
        &self.account
    }

    /// Enter the session's single mutating operation. Held for the whole
    /// transition, wallet suspension points included.
    pub(crate) async fn begin_operation(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}

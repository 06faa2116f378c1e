use std::sync::Arc;

use crate::LedgerGateway;

/// Connection to the ledger: the gateway plus the account that signs writes.
///
/// Passed explicitly to every component instead of living in global state.
#[derive(Debug)]
pub struct LedgerContext<L> {
    gateway: Arc<L>,
    account: String,
}

impl<L> Clone for LedgerContext<L> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            account: self.account.clone(),
        }
    }
}

impl<L> LedgerContext<L>
where
    L: LedgerGateway,
{
    pub fn new(
        gateway: Arc<L>,
        account: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            account: account.into(),
        }
    }

    /// Same gateway, signed by another account (a voter's wallet).
    pub fn with_account(
        &self,
        account: impl Into<String>,
    ) -> Self {
        Self {
            gateway: self.gateway.clone(),
            account: account.into(),
        }
    }

    #[inline]
    pub fn gateway(&self) -> &L {
        &self.gateway
    }

    #[inline]
    pub fn account(&self) -> &str {
        &self.account
    }
}

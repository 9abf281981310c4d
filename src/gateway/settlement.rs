use std::sync::Arc;

use crate::domain::product::{AccountAddress, Product, ProductError, TransactionHash};
use crate::error::MarketError;
use crate::wallet::{ReceiptStatus, TransferRequest, WalletError, WalletProvider};

// ============================================================================
// Payment Settlement
// ============================================================================
//
// Executes the on-chain value transfer for a purchase and confirms it via
// the ledger's receipt. Invoked only from the purchase operation. Once the
// transfer has been submitted it cannot be withdrawn; the attempt terminates
// in either a successful receipt or a typed failure.
//
// ============================================================================

/// Fixed settlement recipient for purchase transfers.
pub const SETTLEMENT_RECIPIENT: &str = "0x434c5f151ab7241549e7bad70b2f8dbe3328b7ab";
pub const TRANSFER_GAS: &str = "0x55555";
pub const TRANSFER_DATA: &str = "0x";

/// Decimal places of the currency's smallest unit.
const SMALLEST_UNIT_DECIMALS: u32 = 18;

pub struct PaymentSettlement<W> {
    provider: Arc<W>,
}

impl<W: WalletProvider> PaymentSettlement<W> {
    pub fn new(provider: Arc<W>) -> Self {
        Self { provider }
    }

    /// Settle a purchase. `product` must be the freshest store snapshot: the
    /// guards are re-validated here before anything is submitted.
    pub async fn settle(
        &self,
        buyer: &AccountAddress,
        product: &Product,
        price: &str,
    ) -> Result<TransactionHash, MarketError> {
        product.guard_purchase(buyer)?;

        let value = price_to_wei_hex(price)?;
        let request = TransferRequest {
            from: buyer.clone(),
            to: AccountAddress::new(SETTLEMENT_RECIPIENT),
            value,
            gas: TRANSFER_GAS.to_string(),
            data: TRANSFER_DATA.to_string(),
        };

        tracing::debug!(
            product_id = %product.id,
            from = %request.from,
            value = %request.value,
            "Submitting value transfer"
        );

        let hash = self
            .provider
            .send_value_transfer(request)
            .await
            .map_err(settlement_error)?;

        let receipt = self
            .provider
            .get_receipt(hash.clone())
            .await
            .map_err(settlement_error)?;

        match receipt {
            Some(r) if r.status == ReceiptStatus::Success => {
                tracing::info!(product_id = %product.id, transaction = %hash, "Transfer settled");
                Ok(hash)
            }
            _ => {
                tracing::warn!(product_id = %product.id, transaction = %hash, "Transfer not confirmed");
                Err(MarketError::TransactionFailed(hash))
            }
        }
    }
}

/// Settlement-step error mapping: an unreachable provider and the standard
/// user-rejection code get their taxonomy labels; everything else propagates
/// as the raw wallet error.
fn settlement_error(err: WalletError) -> MarketError {
    match err {
        WalletError::Unavailable => MarketError::WalletUnavailable,
        e if e.is_user_rejection() => MarketError::UserRejected,
        other => MarketError::Wallet(other),
    }
}

/// Convert a decimal major-unit amount (e.g. "0.05") into the smallest unit
/// (x 10^18) encoded as a `0x`-prefixed base-16 string. Exact integer
/// arithmetic; malformed input and more than 18 fractional digits are
/// validation errors.
pub fn price_to_wei_hex(price: &str) -> Result<String, ProductError> {
    let invalid = || ProductError::InvalidPrice(price.to_string());

    let (whole, frac) = match price.split_once('.') {
        Some((w, f)) => (w, f),
        None => (price, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > SMALLEST_UNIT_DECIMALS as usize {
        return Err(invalid());
    }

    let whole_units: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        let digits: u128 = frac.parse().map_err(|_| invalid())?;
        digits * 10u128.pow(SMALLEST_UNIT_DECIMALS - frac.len() as u32)
    };

    let wei = whole_units
        .checked_mul(10u128.pow(SMALLEST_UNIT_DECIMALS))
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(invalid)?;

    Ok(format!("{wei:#x}"))
}

// ============================================================================
// Unit Tests
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use aurora_market::wallet::{
    ReceiptStatus, TransactionReceipt, TransferRequest, TypedIntent, WalletError, WalletProvider,
};
use aurora_market::{
    AccountAddress, ImageRef, Marketplace, Price, Product, ProductId, ProductStatus, Session,
    ShippingForm, TransactionHash,
};

// ============================================================================
// Demo driver: full order lifecycle against a simulated wallet provider
// ============================================================================

const SELLER: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
const BUYER: &str = "0x8315177ab297ba92a06054ce80a67ed4dbd7ed3a";

/// In-process wallet that approves every request. Stands in for the external
/// signing provider so the demo can run unattended.
struct SimWallet {
    account: AccountAddress,
}

#[async_trait]
impl WalletProvider for SimWallet {
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, WalletError> {
        Ok(vec![self.account.clone()])
    }

    async fn chain_id(&self) -> Result<String, WalletError> {
        Ok("0x1".to_string())
    }

    async fn sign_typed_data(
        &self,
        account: AccountAddress,
        payload: TypedIntent,
    ) -> Result<String, WalletError> {
        tracing::info!(
            account = %account,
            action = %payload.message.action,
            details = %payload.message.details,
            "Signing intent"
        );
        Ok(format!("0x{}", Uuid::new_v4().simple()))
    }

    async fn send_value_transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransactionHash, WalletError> {
        tracing::info!(from = %request.from, to = %request.to, value = %request.value, "Submitting transfer");
        Ok(TransactionHash::new(format!(
            "0x{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        )))
    }

    async fn get_receipt(
        &self,
        transaction: TransactionHash,
    ) -> Result<Option<TransactionReceipt>, WalletError> {
        Ok(Some(TransactionReceipt {
            transaction_hash: transaction,
            status: ReceiptStatus::Success,
        }))
    }
}

fn seed_catalog() -> Vec<Product> {
    vec![Product {
        id: ProductId::new(),
        name: "Nordic Thermal Parka".to_string(),
        description: "Wind-resistant parka with warm lining and classic design".to_string(),
        price: Price::new("0.05"),
        image: ImageRef::new("ipfs://parka"),
        seller: AccountAddress::new("0xbe0eb53f46cd790cd13851d5eff43d12404d33e8"),
        buyer: None,
        status: ProductStatus::Available,
        tracking_number: String::new(),
        shipping_details: None,
        transaction_hash: None,
        created_at: chrono::Utc::now(),
    }]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging, RUST_LOG-overridable.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,aurora_market=debug")),
        )
        .init();

    tracing::info!("Starting marketplace order workflow demo");

    let provider = Arc::new(SimWallet {
        account: AccountAddress::new(SELLER),
    });
    let market = Marketplace::with_catalog(provider.clone(), seed_catalog());

    let seller = Session::connect(provider.as_ref()).await?;
    let buyer = Session::new(AccountAddress::new(BUYER));

    // Seller lists a product.
    let listed = market
        .list(
            &seller,
            "Glacier Insulated Jacket",
            "Lightweight windbreaker in an elegant navy color",
            "0.02",
            "ipfs://jacket",
        )
        .await?;
    tracing::info!(product_id = %listed.id, status = listed.new_status.label(), "Listed");

    // Buyer purchases: the transfer settles, the catalog shows SOLD while the
    // owner views show PENDING_SHIPPING.
    let purchased = market.purchase(&buyer, listed.id, "0.02").await?;
    tracing::info!(
        product_id = %purchased.id,
        transaction = ?purchased.transaction_hash,
        "Purchased"
    );

    // Seller ships with a generated tracking number.
    let form = ShippingForm {
        recipient_name: "Demo Buyer".to_string(),
        address: "1 Harbour Street".to_string(),
        city: "Helsinki".to_string(),
        postal_code: "00100".to_string(),
        courier_service: "DHL".to_string(),
        ..ShippingForm::default()
    };
    let shipped = market.ship(&seller, listed.id, form).await?;
    tracing::info!(
        product_id = %shipped.id,
        tracking = ?shipped.tracking_number,
        "Shipped"
    );

    // Buyer confirms receipt. The transition record is what a presentation
    // layer would render.
    let confirmed = market.confirm_receipt(&buyer, listed.id).await?;
    tracing::info!(
        record = %serde_json::to_string(&confirmed)?,
        "Completed"
    );

    // All three views agree on the final state.
    let catalog = market.catalog().await;
    let listings = market.listings_of(seller.account()).await;
    let purchases = market.purchases_of(buyer.account()).await;
    tracing::info!(
        catalog = catalog.len(),
        listings = listings.len(),
        purchases = purchases.len(),
        final_status = catalog[0].status_label,
        "View summary"
    );

    // A late cancellation must be rejected.
    match market.cancel(&seller, listed.id).await {
        Err(err) => tracing::info!(%err, "Late cancel rejected as expected"),
        Ok(_) => anyhow::bail!("late cancel unexpectedly succeeded"),
    }

    tracing::info!("Demo complete");
    Ok(())
}

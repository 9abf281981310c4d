use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::product::{
    AccountAddress, ImageRef, Price, Product, ProductCommand, ProductError, ProductId,
    ShippingDetails, ShippingForm, TransitionRecord,
};
use crate::error::MarketError;
use crate::gateway::{AuthorizationGateway, PaymentSettlement};
use crate::store::{MarketStore, ViewEntry};
use crate::wallet::{IntentAction, WalletProvider};

use super::session::Session;
use super::tracking::TrackingNumberGenerator;

// ============================================================================
// Marketplace Service
// ============================================================================
//
// Orchestrates: guards → authorization → (settlement) → transition → commit.
//
// Every mutating operation runs under the session's in-flight gate, re-reads
// the product from the store before requesting authorization, and commits
// state plus all derived views in a single store write. A failure anywhere
// along the pipeline leaves the store untouched.
//
// ============================================================================

pub struct Marketplace<W> {
    store: RwLock<MarketStore>,
    authorization: AuthorizationGateway<W>,
    settlement: PaymentSettlement<W>,
    tracking: TrackingNumberGenerator,
}

impl<W: WalletProvider> Marketplace<W> {
    pub fn new(provider: Arc<W>) -> Self {
        Self::with_catalog(provider, Vec::new())
    }

    /// Build the marketplace over an initial catalog snapshot supplied by an
    /// external provisioning source.
    pub fn with_catalog(provider: Arc<W>, seed: Vec<Product>) -> Self {
        Self {
            store: RwLock::new(MarketStore::seed(seed)),
            authorization: AuthorizationGateway::new(provider.clone()),
            settlement: PaymentSettlement::new(provider),
            tracking: TrackingNumberGenerator,
        }
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    pub async fn catalog(&self) -> Vec<ViewEntry> {
        self.store.read().await.catalog()
    }

    pub async fn listings_of(&self, seller: &AccountAddress) -> Vec<ViewEntry> {
        self.store.read().await.listings_of(seller)
    }

    pub async fn purchases_of(&self, buyer: &AccountAddress) -> Vec<ViewEntry> {
        self.store.read().await.purchases_of(buyer)
    }

    pub async fn product(&self, id: ProductId) -> Option<Product> {
        self.store.read().await.get(&id).cloned()
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// List a new product. Requires a signed `LIST_PRODUCT` intent.
    pub async fn list(
        &self,
        session: &Session,
        name: &str,
        description: &str,
        price: &str,
        image: &str,
    ) -> Result<TransitionRecord, MarketError> {
        let _op = session.begin_operation().await;

        let listed = Product::listed(
            session.account().clone(),
            name,
            description,
            Price::new(price),
            ImageRef::new(image),
        )?;

        let details = format!("List {} for {} ETH", listed.name, listed.price);
        self.authorization
            .request_signature(session.account(), IntentAction::ListProduct, details)
            .await?;

        let product = Product::from_listed(&listed);
        let record = TransitionRecord::capture(&product);
        self.store.write().await.insert_listing(product);

        tracing::info!(product_id = %listed.id, seller = %listed.seller, "Product listed");
        Ok(record)
    }

    /// Purchase a product. The wallet's approval of the value transfer is the
    /// authorization for this transition; guards are validated before any
    /// wallet interaction and the transfer only settles against the freshest
    /// snapshot.
    pub async fn purchase(
        &self,
        session: &Session,
        product_id: ProductId,
        price: &str,
    ) -> Result<TransitionRecord, MarketError> {
        let _op = session.begin_operation().await;

        let buyer = session.account().clone();
        let snapshot = self.snapshot(product_id).await?;
        snapshot.guard_purchase(&buyer)?;

        let transaction_hash = self.settlement.settle(&buyer, &snapshot, price).await?;

        let record = self
            .commit(
                product_id,
                &ProductCommand::Purchase {
                    buyer: buyer.clone(),
                    transaction_hash,
                },
            )
            .await?;

        tracing::info!(product_id = %product_id, buyer = %buyer, "Purchase settled");
        Ok(record)
    }

    /// Ship a purchased product. Generates the tracking number, then requires
    /// a signed `UPDATE_SHIPPING` intent naming it.
    pub async fn ship(
        &self,
        session: &Session,
        product_id: ProductId,
        form: ShippingForm,
    ) -> Result<TransitionRecord, MarketError> {
        let _op = session.begin_operation().await;

        let requester = session.account().clone();
        let snapshot = self.snapshot(product_id).await?;
        snapshot.guard_ship(&requester)?;

        let tracking_number = self.tracking.generate();
        let recipient = snapshot
            .buyer
            .as_ref()
            .map(AccountAddress::as_str)
            .unwrap_or_default();
        let details = format!(
            "Ship {} to {} with tracking {}",
            snapshot.name, recipient, tracking_number
        );
        self.authorization
            .request_signature(&requester, IntentAction::UpdateShipping, details)
            .await?;

        let record = self
            .commit(
                product_id,
                &ProductCommand::Ship {
                    requester,
                    details: ShippingDetails {
                        form,
                        tracking_number: tracking_number.clone(),
                        shipped_at: chrono::Utc::now(),
                    },
                },
            )
            .await?;

        tracing::info!(product_id = %product_id, tracking = %tracking_number, "Product shipped");
        Ok(record)
    }

    /// Confirm receipt of a shipped product. Requires a signed
    /// `CONFIRM_RECEIPT` intent.
    pub async fn confirm_receipt(
        &self,
        session: &Session,
        product_id: ProductId,
    ) -> Result<TransitionRecord, MarketError> {
        let _op = session.begin_operation().await;

        let requester = session.account().clone();
        let snapshot = self.snapshot(product_id).await?;
        snapshot.guard_confirm_receipt(&requester)?;

        let details = format!(
            "Confirm receipt of {} from {}",
            snapshot.name, snapshot.seller
        );
        self.authorization
            .request_signature(&requester, IntentAction::ConfirmReceipt, details)
            .await?;

        let record = self
            .commit(product_id, &ProductCommand::ConfirmReceipt { requester })
            .await?;

        tracing::info!(product_id = %product_id, "Receipt confirmed");
        Ok(record)
    }

    /// Cancel a listing. Requires a signed `CANCEL_LISTING` intent.
    pub async fn cancel(
        &self,
        session: &Session,
        product_id: ProductId,
    ) -> Result<TransitionRecord, MarketError> {
        let _op = session.begin_operation().await;

        let requester = session.account().clone();
        let snapshot = self.snapshot(product_id).await?;
        snapshot.guard_cancel(&requester)?;

        let details = format!("Cancel listing for {}", snapshot.name);
        self.authorization
            .request_signature(&requester, IntentAction::CancelListing, details)
            .await?;

        let record = self
            .commit(product_id, &ProductCommand::Cancel { requester })
            .await?;

        tracing::info!(product_id = %product_id, "Listing cancelled");
        Ok(record)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn snapshot(&self, id: ProductId) -> Result<Product, ProductError> {
        self.store
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ProductError::NotFound(id))
    }

    /// Re-run the guards against current state and commit the transition as
    /// a single store write observed by every view at once.
    async fn commit(
        &self,
        product_id: ProductId,
        command: &ProductCommand,
    ) -> Result<TransitionRecord, MarketError> {
        let mut store = self.store.write().await;
        let product = store
            .get(&product_id)
            .ok_or(ProductError::NotFound(product_id))?;
        let event = product.handle_command(command)?;
        let updated = store.apply(&product_id, &event)?;

        tracing::debug!(
            product_id = %product_id,
            event = event.event_type(),
            new_status = updated.status.label(),
            "Transition committed"
        );
        Ok(TransitionRecord::capture(&updated))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{ProductStatus, TransactionHash};
    use crate::wallet::{MockWalletProvider, ReceiptStatus, TransactionReceipt, WalletError};
    use chrono::Utc;

    const SELLER: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
    const BUYER: &str = "0x8315177ab297ba92a06054ce80a67ed4dbd7ed3a";

    /// A provider that approves every signature and settles every transfer.
    fn approving_wallet() -> MockWalletProvider {
        let mut wallet = MockWalletProvider::new();
        wallet.expect_chain_id().returning(|| Ok("0x1".to_string()));
        wallet
            .expect_sign_typed_data()
            .returning(|_, _| Ok("0xsignature".to_string()));
        wallet
            .expect_send_value_transfer()
            .returning(|_| Ok(TransactionHash::new("0xfeedbeef")));
        wallet.expect_get_receipt().returning(|hash| {
            Ok(Some(TransactionReceipt {
                transaction_hash: hash,
                status: ReceiptStatus::Success,
            }))
        });
        wallet
    }

    fn seeded_product(seller: &str, status: ProductStatus, buyer: Option<&str>) -> Product {
        Product {
            id: ProductId::new(),
            name: "Nordic Thermal Parka".to_string(),
            description: "Wind-resistant parka with warm lining".to_string(),
            price: Price::new("0.05"),
            image: ImageRef::new("ipfs://parka"),
            seller: AccountAddress::new(seller),
            buyer: buyer.map(AccountAddress::new),
            status,
            tracking_number: String::new(),
            shipping_details: None,
            transaction_hash: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_full_order_lifecycle_across_all_views() {
        let market = Marketplace::new(Arc::new(approving_wallet()));
        let seller = Session::new(AccountAddress::new(SELLER));
        let buyer = Session::new(AccountAddress::new(BUYER));

        // List.
        let listed = market
            .list(&seller, "Jacket", "Warm winter jacket", "0.05", "ipfs://jacket")
            .await
            .unwrap();
        assert_eq!(listed.new_status, ProductStatus::Available);

        let catalog = market.catalog().await;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].status_label, "AVAILABLE");
        assert!(catalog[0].product.buyer.is_none());

        // Purchase.
        let purchased = market.purchase(&buyer, listed.id, "0.05").await.unwrap();
        assert_eq!(purchased.new_status, ProductStatus::PendingShipping);
        assert_eq!(
            purchased.transaction_hash,
            Some(TransactionHash::new("0xfeedbeef"))
        );

        let catalog = market.catalog().await;
        let listings = market.listings_of(seller.account()).await;
        let purchases = market.purchases_of(buyer.account()).await;
        assert_eq!(catalog[0].status_label, "SOLD");
        assert_eq!(listings[0].status_label, "PENDING_SHIPPING");
        assert_eq!(purchases.len(), 1);
        for view in [&catalog[0], &listings[0], &purchases[0]] {
            assert_eq!(view.product.status, ProductStatus::PendingShipping);
            assert_eq!(view.product.buyer, Some(AccountAddress::new(BUYER)));
            assert_eq!(
                view.product.transaction_hash,
                Some(TransactionHash::new("0xfeedbeef"))
            );
        }

        // Ship.
        let form = ShippingForm {
            recipient_name: "B. Buyer".to_string(),
            city: "Helsinki".to_string(),
            courier_service: "DHL".to_string(),
            ..ShippingForm::default()
        };
        let shipped = market.ship(&seller, listed.id, form).await.unwrap();
        assert_eq!(shipped.new_status, ProductStatus::Shipped);
        let tracking = shipped.tracking_number.unwrap();
        assert!(tracking.starts_with("ALY-"));

        let catalog = market.catalog().await;
        let listings = market.listings_of(seller.account()).await;
        let purchases = market.purchases_of(buyer.account()).await;
        for view in [&catalog[0], &listings[0], &purchases[0]] {
            assert_eq!(view.product.status, ProductStatus::Shipped);
            assert_eq!(view.product.tracking_number, tracking);
            assert_eq!(
                view.product
                    .shipping_details
                    .as_ref()
                    .map(|d| d.tracking_number.as_str()),
                Some(tracking.as_str())
            );
        }

        // Confirm receipt.
        let confirmed = market.confirm_receipt(&buyer, listed.id).await.unwrap();
        assert_eq!(confirmed.new_status, ProductStatus::Completed);
        for view in [
            &market.catalog().await[0],
            &market.listings_of(seller.account()).await[0],
            &market.purchases_of(buyer.account()).await[0],
        ] {
            assert_eq!(view.product.status, ProductStatus::Completed);
        }

        // A late cancel must fail and change nothing.
        let err = market.cancel(&seller, listed.id).await.unwrap_err();
        assert_eq!(
            err,
            MarketError::Validation(ProductError::NotCancellable(ProductStatus::Completed))
        );
        assert_eq!(
            market.product(listed.id).await.unwrap().status,
            ProductStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_purchase_of_unavailable_product_touches_no_wallet_and_no_state() {
        // No expectations: any wallet call would panic the test.
        let seed = seeded_product(SELLER, ProductStatus::PendingShipping, Some(BUYER));
        let id = seed.id;
        let market =
            Marketplace::with_catalog(Arc::new(MockWalletProvider::new()), vec![seed.clone()]);
        let buyer = Session::new(AccountAddress::new(BUYER));

        let err = market.purchase(&buyer, id, "0.05").await.unwrap_err();
        assert_eq!(err, MarketError::Validation(ProductError::NotAvailable));
        assert_eq!(market.product(id).await.unwrap(), seed);
    }

    #[tokio::test]
    async fn test_self_purchase_is_rejected_case_insensitively() {
        let seed = seeded_product(SELLER, ProductStatus::Available, None);
        let id = seed.id;
        let market = Marketplace::with_catalog(Arc::new(MockWalletProvider::new()), vec![seed]);
        let same_account_upper = SELLER.to_uppercase().replacen("0X", "0x", 1);
        let seller = Session::new(AccountAddress::new(same_account_upper));

        let err = market.purchase(&seller, id, "0.05").await.unwrap_err();
        assert_eq!(err, MarketError::Validation(ProductError::SelfPurchase));
    }

    #[tokio::test]
    async fn test_purchase_of_unknown_product_fails_not_found() {
        let market = Marketplace::new(Arc::new(MockWalletProvider::new()));
        let buyer = Session::new(AccountAddress::new(BUYER));
        let id = ProductId::new();

        let err = market.purchase(&buyer, id, "0.05").await.unwrap_err();
        assert_eq!(err, MarketError::Validation(ProductError::NotFound(id)));
    }

    #[tokio::test]
    async fn test_failed_settlement_receipt_leaves_state_untouched() {
        let mut wallet = MockWalletProvider::new();
        wallet
            .expect_send_value_transfer()
            .returning(|_| Ok(TransactionHash::new("0xfeedbeef")));
        wallet.expect_get_receipt().returning(|_| Ok(None));

        let seed = seeded_product(SELLER, ProductStatus::Available, None);
        let id = seed.id;
        let market = Marketplace::with_catalog(Arc::new(wallet), vec![seed.clone()]);
        let buyer = Session::new(AccountAddress::new(BUYER));

        let err = market.purchase(&buyer, id, "0.05").await.unwrap_err();
        assert!(matches!(err, MarketError::TransactionFailed(_)));

        let after = market.product(id).await.unwrap();
        assert_eq!(after, seed);
        assert!(market.purchases_of(buyer.account()).await.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_listing_signature_commits_nothing() {
        let mut wallet = MockWalletProvider::new();
        wallet.expect_chain_id().returning(|| Ok("0x1".to_string()));
        wallet
            .expect_sign_typed_data()
            .returning(|_, _| Err(WalletError::rejected()));

        let market = Marketplace::new(Arc::new(wallet));
        let seller = Session::new(AccountAddress::new(SELLER));

        let err = market
            .list(&seller, "Jacket", "desc", "0.05", "")
            .await
            .unwrap_err();
        assert_eq!(err, MarketError::UserRejected);
        assert!(market.catalog().await.is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_operations_serialize_and_recheck_guards() {
        let mut wallet = MockWalletProvider::new();
        // Exactly one transfer may ever be submitted.
        wallet
            .expect_send_value_transfer()
            .times(1)
            .returning(|_| Ok(TransactionHash::new("0xfeedbeef")));
        wallet.expect_get_receipt().times(1).returning(|hash| {
            Ok(Some(TransactionReceipt {
                transaction_hash: hash,
                status: ReceiptStatus::Success,
            }))
        });

        let seed = seeded_product(SELLER, ProductStatus::Available, None);
        let id = seed.id;
        let market = Marketplace::with_catalog(Arc::new(wallet), vec![seed]);
        let buyer = Session::new(AccountAddress::new(BUYER));

        let (first, second) =
            tokio::join!(market.purchase(&buyer, id, "0.05"), market.purchase(&buyer, id, "0.05"));

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        let failure = outcomes.iter().find(|r| r.is_err()).unwrap();
        assert_eq!(
            failure.as_ref().unwrap_err(),
            &MarketError::Validation(ProductError::NotAvailable)
        );
    }

    #[tokio::test]
    async fn test_ship_and_confirm_are_guarded_by_identity() {
        let market = Marketplace::new(Arc::new(approving_wallet()));
        let seller = Session::new(AccountAddress::new(SELLER));
        let buyer = Session::new(AccountAddress::new(BUYER));

        let listed = market
            .list(&seller, "Jacket", "desc", "0.05", "")
            .await
            .unwrap();
        market.purchase(&buyer, listed.id, "0.05").await.unwrap();

        // Only the seller ships.
        let err = market
            .ship(&buyer, listed.id, ShippingForm::default())
            .await
            .unwrap_err();
        assert_eq!(err, MarketError::Validation(ProductError::NotSeller));

        market
            .ship(&seller, listed.id, ShippingForm::default())
            .await
            .unwrap();

        // Only the buyer confirms.
        let err = market.confirm_receipt(&seller, listed.id).await.unwrap_err();
        assert_eq!(err, MarketError::Validation(ProductError::NotBuyer));
    }

    #[tokio::test]
    async fn test_cancel_before_shipment_from_both_eligible_states() {
        let market = Marketplace::new(Arc::new(approving_wallet()));
        let seller = Session::new(AccountAddress::new(SELLER));
        let buyer = Session::new(AccountAddress::new(BUYER));

        // Cancel a fresh listing.
        let first = market
            .list(&seller, "Jacket", "desc", "0.05", "")
            .await
            .unwrap();
        let record = market.cancel(&seller, first.id).await.unwrap();
        assert_eq!(record.new_status, ProductStatus::Cancelled);
        assert!(market.product(first.id).await.unwrap().buyer.is_none());

        // Cancel a sold-but-unshipped listing.
        let second = market
            .list(&seller, "Parka", "desc", "0.02", "")
            .await
            .unwrap();
        market.purchase(&buyer, second.id, "0.02").await.unwrap();
        let record = market.cancel(&seller, second.id).await.unwrap();
        assert_eq!(record.new_status, ProductStatus::Cancelled);
        assert!(market.product(second.id).await.unwrap().buyer.is_none());
    }

    #[tokio::test]
    async fn test_seeded_snapshot_populates_all_views() {
        let open = seeded_product(SELLER, ProductStatus::Available, None);
        let sold = seeded_product(SELLER, ProductStatus::PendingShipping, Some(BUYER));
        let market = Marketplace::with_catalog(
            Arc::new(MockWalletProvider::new()),
            vec![open.clone(), sold.clone()],
        );

        let catalog = market.catalog().await;
        assert_eq!(catalog.len(), 2);
        // Newest listing first.
        assert_eq!(catalog[0].product.id, sold.id);
        assert_eq!(catalog[0].status_label, "SOLD");

        let listings = market.listings_of(&AccountAddress::new(SELLER)).await;
        assert_eq!(listings.len(), 2);

        let purchases = market.purchases_of(&AccountAddress::new(BUYER)).await;
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].product.id, sold.id);
    }
}

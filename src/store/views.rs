use serde::Serialize;

use crate::domain::product::{AccountAddress, Product};

use super::market_store::MarketStore;

// ============================================================================
// Derived Views
// ============================================================================
//
// The three views are read queries over the single store. Each returns
// snapshots ordered the way the presentation layer expects:
// - catalog: every product ever listed, newest listing first
// - seller listings: the seller's products, including post-sale history
// - buyer purchases: what the buyer bought, newest purchase first
// Updates never reorder: ordering follows the listing/purchase sequences,
// which only ever append.
//
// ============================================================================

/// A product as a view presents it. The label is view-facing: the catalog
/// shows `SOLD` where the owner views show `PENDING_SHIPPING`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEntry {
    #[serde(flatten)]
    pub product: Product,
    pub status_label: &'static str,
}

impl MarketStore {
    /// The global catalog: every product ever listed, most recent first.
    pub fn catalog(&self) -> Vec<ViewEntry> {
        self.listing_order
            .iter()
            .rev()
            .filter_map(|id| self.products.get(id))
            .map(|product| ViewEntry {
                status_label: product.status.catalog_label(),
                product: product.clone(),
            })
            .collect()
    }

    /// Products listed by `seller`, most recent first, including sold,
    /// shipped, completed and cancelled history.
    pub fn listings_of(&self, seller: &AccountAddress) -> Vec<ViewEntry> {
        self.listing_order
            .iter()
            .rev()
            .filter_map(|id| self.products.get(id))
            .filter(|product| product.seller.matches(seller))
            .map(|product| ViewEntry {
                status_label: product.status.label(),
                product: product.clone(),
            })
            .collect()
    }

    /// Products `buyer` has purchased, most recent purchase first.
    pub fn purchases_of(&self, buyer: &AccountAddress) -> Vec<ViewEntry> {
        self.purchase_order
            .iter()
            .rev()
            .filter_map(|id| self.products.get(id))
            .filter(|product| {
                product
                    .buyer
                    .as_ref()
                    .is_some_and(|owner| owner.matches(buyer))
            })
            .map(|product| ViewEntry {
                status_label: product.status.label(),
                product: product.clone(),
            })
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{
        ImageRef, Price, ProductEvent, ProductPurchased, TransactionHash,
    };

    const ALICE: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
    const BOB: &str = "0x8315177ab297ba92a06054ce80a67ed4dbd7ed3a";

    fn listed_by(seller: &str, name: &str) -> Product {
        let event = Product::listed(
            AccountAddress::new(seller),
            name,
            "desc",
            Price::new("0.01"),
            ImageRef::new(""),
        )
        .unwrap();
        Product::from_listed(&event)
    }

    fn names(entries: &[ViewEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.product.name.as_str()).collect()
    }

    #[test]
    fn test_catalog_orders_newest_listing_first() {
        let mut store = MarketStore::new();
        store.insert_listing(listed_by(ALICE, "First"));
        store.insert_listing(listed_by(BOB, "Second"));
        store.insert_listing(listed_by(ALICE, "Third"));

        assert_eq!(names(&store.catalog()), vec!["Third", "Second", "First"]);
        assert_eq!(names(&store.listings_of(&AccountAddress::new(ALICE))), vec!["Third", "First"]);
    }

    #[test]
    fn test_update_preserves_catalog_position() {
        let mut store = MarketStore::new();
        store.insert_listing(listed_by(ALICE, "First"));
        let middle = listed_by(ALICE, "Second");
        let middle_id = middle.id;
        store.insert_listing(middle);
        store.insert_listing(listed_by(ALICE, "Third"));

        store
            .apply(
                &middle_id,
                &ProductEvent::Purchased(ProductPurchased {
                    buyer: AccountAddress::new(BOB),
                    transaction_hash: TransactionHash::new("0xfeed"),
                }),
            )
            .unwrap();

        assert_eq!(names(&store.catalog()), vec!["Third", "Second", "First"]);
    }

    #[test]
    fn test_catalog_label_differs_from_owner_views_after_purchase() {
        let mut store = MarketStore::new();
        let product = listed_by(ALICE, "Jacket");
        let id = product.id;
        store.insert_listing(product);
        store
            .apply(
                &id,
                &ProductEvent::Purchased(ProductPurchased {
                    buyer: AccountAddress::new(BOB),
                    transaction_hash: TransactionHash::new("0xfeed"),
                }),
            )
            .unwrap();

        assert_eq!(store.catalog()[0].status_label, "SOLD");
        assert_eq!(
            store.listings_of(&AccountAddress::new(ALICE))[0].status_label,
            "PENDING_SHIPPING"
        );
        assert_eq!(
            store.purchases_of(&AccountAddress::new(BOB))[0].status_label,
            "PENDING_SHIPPING"
        );
    }

    #[test]
    fn test_purchases_view_is_scoped_to_the_buyer_and_never_duplicates() {
        let mut store = MarketStore::new();
        let product = listed_by(ALICE, "Jacket");
        let id = product.id;
        store.insert_listing(product);
        store
            .apply(
                &id,
                &ProductEvent::Purchased(ProductPurchased {
                    buyer: AccountAddress::new(BOB),
                    transaction_hash: TransactionHash::new("0xfeed"),
                }),
            )
            .unwrap();

        let bob = AccountAddress::new(BOB);
        assert_eq!(store.purchases_of(&bob).len(), 1);
        assert!(store.purchases_of(&AccountAddress::new(ALICE)).is_empty());

        let ids: Vec<_> = store.purchases_of(&bob).iter().map(|e| e.product.id).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
    }
}

use std::collections::HashMap;

use crate::domain::product::{Product, ProductError, ProductEvent, ProductId};

// ============================================================================
// Market Store - Single Authoritative Product Store
// ============================================================================
//
// One record per product, keyed by id. The catalog, seller-listings and
// buyer-purchases views are derived read queries (see views.rs), so a
// committed transition is a single write that every view observes at once —
// view copies cannot drift apart because there are no view copies.
//
// ============================================================================

#[derive(Debug, Default)]
pub struct MarketStore {
    pub(crate) products: HashMap<ProductId, Product>,
    /// Listing order, oldest first. Views render newest first.
    pub(crate) listing_order: Vec<ProductId>,
    /// Purchase order, oldest first. The purchases view renders newest first.
    pub(crate) purchase_order: Vec<ProductId>,
}

impl MarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest an initial catalog snapshot. Records are opaque and taken
    /// as-is in listing order; records that already carry a buyer also
    /// enter the purchase ordering so the buyer's view is complete.
    pub fn seed(products: Vec<Product>) -> Self {
        let mut store = Self::new();
        for product in products {
            if store.products.contains_key(&product.id) {
                tracing::warn!(product_id = %product.id, "Duplicate id in seed snapshot, skipped");
                continue;
            }
            store.listing_order.push(product.id);
            if product.buyer.is_some() {
                store.purchase_order.push(product.id);
            }
            store.products.insert(product.id, product);
        }
        store
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Commit a new listing: the product enters the catalog (and thereby its
    /// seller's listings view).
    pub fn insert_listing(&mut self, product: Product) {
        debug_assert!(!self.products.contains_key(&product.id));
        self.listing_order.push(product.id);
        self.products.insert(product.id, product);
    }

    /// Commit a transition event to the one authoritative record and return
    /// the updated state. A purchase additionally enters the product into
    /// the purchase ordering, exactly once.
    pub fn apply(
        &mut self,
        id: &ProductId,
        event: &ProductEvent,
    ) -> Result<Product, ProductError> {
        let product = self
            .products
            .get_mut(id)
            .ok_or(ProductError::NotFound(*id))?;
        product.apply_event(event);
        let updated = product.clone();

        if matches!(event, ProductEvent::Purchased(_)) && !self.purchase_order.contains(id) {
            self.purchase_order.push(*id);
        }

        Ok(updated)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

// ============================================================================
// aurora_market - Peer-to-Peer Marketplace Order Core
// ============================================================================
//
// A seller lists an item, a buyer pays via an on-chain value transfer, the
// seller ships and records a tracking identifier, and the buyer confirms
// receipt. The core is the product state machine and the consistency of the
// catalog / seller-listings / buyer-purchases views, every mutation gated by
// a wallet-signed intent and, for purchases, an on-chain settlement.
//
// Layers:
// - domain:  product aggregate, commands, events, guards
// - wallet:  external signing-provider boundary + typed intents
// - gateway: authorization (signatures) and settlement (transfers)
// - store:   single authoritative store with derived views
// - service: session context and the marketplace orchestrator
//
// ============================================================================

pub mod domain;
pub mod error;
pub mod gateway;
pub mod service;
pub mod store;
pub mod wallet;

pub use domain::product::{
    permitted_actions, AccountAddress, ImageRef, Party, Price, Product, ProductAction,
    ProductError, ProductId, ProductStatus, ShippingDetails, ShippingForm, TransactionHash,
    TransitionRecord,
};
pub use error::MarketError;
pub use gateway::{AuthorizationGateway, PaymentSettlement};
pub use service::{Marketplace, Session, TrackingNumberGenerator};
pub use store::{MarketStore, ViewEntry};
pub use wallet::{IntentAction, WalletError, WalletProvider};

// ============================================================================
// Gateways - Authorization and Settlement over the Wallet Boundary
// ============================================================================
//
// Both gateways sit between the marketplace operations and the external
// wallet provider:
// - AuthorizationGateway: signed, domain-separated intent before a mutation.
// - PaymentSettlement: value transfer + receipt check for purchases.
//
// ============================================================================

pub mod authorization;
pub mod settlement;

pub use authorization::AuthorizationGateway;
pub use settlement::{
    price_to_wei_hex, PaymentSettlement, SETTLEMENT_RECIPIENT, TRANSFER_DATA, TRANSFER_GAS,
};

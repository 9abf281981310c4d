use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Typed Intent Payload
// ============================================================================
//
// Domain-separated structured message signed by the acting party before a
// mutating operation. The signature is purely an authorization gate, not an
// on-chain artifact.
//
// ============================================================================

pub const SIGNING_DOMAIN_NAME: &str = "Aurora Marketplace";
pub const SIGNING_DOMAIN_VERSION: &str = "1";

/// Action tag carried inside a signed intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentAction {
    ListProduct,
    CancelListing,
    UpdateShipping,
    ConfirmReceipt,
}

impl IntentAction {
    pub fn as_str(self) -> &'static str {
        match self {
            IntentAction::ListProduct => "LIST_PRODUCT",
            IntentAction::CancelListing => "CANCEL_LISTING",
            IntentAction::UpdateShipping => "UPDATE_SHIPPING",
            IntentAction::ConfirmReceipt => "CONFIRM_RECEIPT",
        }
    }
}

impl fmt::Display for IntentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentDomain {
    pub name: &'static str,
    pub version: &'static str,
    #[serde(rename = "chainId")]
    pub chain_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentMessage {
    pub action: IntentAction,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentTypes {
    #[serde(rename = "EIP712Domain")]
    pub domain: Vec<FieldDef>,
    #[serde(rename = "Transaction")]
    pub transaction: Vec<FieldDef>,
}

/// The full structured payload handed to the signing provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedIntent {
    pub domain: IntentDomain,
    pub message: IntentMessage,
    #[serde(rename = "primaryType")]
    pub primary_type: &'static str,
    pub types: IntentTypes,
}

impl TypedIntent {
    pub fn new(chain_id: String, action: IntentAction, details: String) -> Self {
        Self {
            domain: IntentDomain {
                name: SIGNING_DOMAIN_NAME,
                version: SIGNING_DOMAIN_VERSION,
                chain_id,
            },
            message: IntentMessage {
                action,
                details,
                timestamp: Utc::now(),
            },
            primary_type: "Transaction",
            types: IntentTypes {
                domain: vec![
                    FieldDef { name: "name", kind: "string" },
                    FieldDef { name: "version", kind: "string" },
                    FieldDef { name: "chainId", kind: "uint256" },
                ],
                transaction: vec![
                    FieldDef { name: "action", kind: "string" },
                    FieldDef { name: "details", kind: "string" },
                    FieldDef { name: "timestamp", kind: "string" },
                ],
            },
        }
    }
}

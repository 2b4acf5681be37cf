use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Which Stripe object backs a billing log row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    CheckoutSession,
    PaymentIntent,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::CheckoutSession => "checkout_session",
            TransactionType::PaymentIntent => "payment_intent",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Simulated payment gateway. Approvals are drawn at random per method,
//! mirroring the flakiness of a real acquirer without any network calls.

use crate::domain::order::PaymentMethod;
use crate::domain::payment::PaymentOutcome;
use crate::domain::ports::PaymentGateway;
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Card approves 95% of the time, Twint 90%, everything else pends.
    Simulated,
    /// Every charge approves. Used by the demo binary and tests that need
    /// reproducible runs.
    AlwaysApprove,
}

pub struct SimulatedGateway {
    mode: Mode,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self {
            mode: Mode::Simulated,
        }
    }

    pub fn always_approve() -> Self {
        Self {
            mode: Mode::AlwaysApprove,
        }
    }

    fn reference(prefix: &str) -> String {
        let mut rng = rand::thread_rng();
        format!("{prefix}-{:06}", rng.gen_range(0..1_000_000))
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(
        &self,
        amount: Decimal,
        currency: &str,
        method: PaymentMethod,
    ) -> Result<PaymentOutcome> {
        // Zero is a valid gross total; only negative amounts are malformed.
        if amount < Decimal::ZERO {
            return Err(StoreError::Validation(
                "charge amount must not be negative".to_string(),
            ));
        }
        debug!(%amount, currency, %method, "charging payment");

        let outcome = match (self.mode, method) {
            (Mode::AlwaysApprove, PaymentMethod::Card) => PaymentOutcome::Succeeded {
                reference: Self::reference("CARD"),
            },
            (Mode::AlwaysApprove, PaymentMethod::Twint) => PaymentOutcome::Succeeded {
                reference: Self::reference("TWINT"),
            },
            (Mode::AlwaysApprove, PaymentMethod::Other) => PaymentOutcome::Succeeded {
                reference: Self::reference("PAY"),
            },
            (Mode::Simulated, PaymentMethod::Card) => {
                if rand::thread_rng().gen_bool(0.95) {
                    PaymentOutcome::Succeeded {
                        reference: Self::reference("CARD"),
                    }
                } else {
                    PaymentOutcome::Failed {
                        reason: "card declined".to_string(),
                    }
                }
            }
            (Mode::Simulated, PaymentMethod::Twint) => {
                if rand::thread_rng().gen_bool(0.90) {
                    PaymentOutcome::Succeeded {
                        reference: Self::reference("TWINT"),
                    }
                } else {
                    PaymentOutcome::Failed {
                        reason: "twint payment rejected".to_string(),
                    }
                }
            }
            (Mode::Simulated, PaymentMethod::Other) => PaymentOutcome::Pending {
                reference: Self::reference("PAY"),
            },
        };
        Ok(outcome)
    }
}

/// Tri-state result of a gateway charge attempt.
///
/// `Pending` means the gateway accepted the request but confirmation will
/// arrive asynchronously (webhook); orders paid this way start in the
/// `pending` status until the confirmation lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded { reference: String },
    Failed { reason: String },
    Pending { reference: String },
}

impl PaymentOutcome {
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Succeeded { reference } | Self::Pending { reference } => Some(reference),
            Self::Failed { .. } => None,
        }
    }
}

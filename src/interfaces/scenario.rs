use crate::application::catalog::ReviewRequest;
use crate::application::checkout::CheckoutRequest;
use crate::domain::cart::CartItem;
use crate::domain::catalog::{Product, Review};
use crate::domain::user::User;
use crate::error::Result;
use serde::Deserialize;
use std::io::Read;
use uuid::Uuid;

/// A self-contained store run: seed data plus the actions to replay
/// against it, in order.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub cart: Vec<CartItem>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One step of a scenario. `actor` names the user the action runs as;
/// order references are indexes into the orders committed so far.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Checkout {
        actor: Uuid,
        request: CheckoutRequest,
    },
    SetStatus {
        actor: Uuid,
        order: usize,
        status: String,
        #[serde(default)]
        tracking_number: Option<String>,
    },
    ResolvePayment {
        reference: String,
        succeeded: bool,
    },
    AddReview {
        actor: Uuid,
        request: ReviewRequest,
    },
}

/// Reads a scenario from a JSON source.
pub struct ScenarioReader<R: Read> {
    source: R,
}

impl<R: Read> ScenarioReader<R> {
    /// Creates a new `ScenarioReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn load(self) -> Result<Scenario> {
        Ok(serde_json::from_reader(self.source)?)
    }
}

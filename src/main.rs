use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use storefront::application::catalog::CatalogService;
use storefront::application::checkout::CheckoutService;
use storefront::application::status::OrderStatusService;
use storefront::config::AppConfig;
use storefront::domain::order::Order;
use storefront::domain::ports::{
    CartStore, NotificationStoreRef, OrderStore, OrderStoreRef, ProductStore, ReviewStore,
    UserStore, UserStoreRef,
};
use storefront::domain::user::Principal;
use storefront::error::StoreError;
use storefront::infrastructure::email::LogMailer;
use storefront::infrastructure::in_memory::{
    InMemoryCartStore, InMemoryNotificationStore, InMemoryOrderStore, InMemoryProductStore,
    InMemoryReviewStore, InMemoryUserStore,
};
use storefront::infrastructure::payment::SimulatedGateway;
#[cfg(feature = "storage-rocksdb")]
use storefront::infrastructure::rocksdb::RocksDbStore;
use storefront::interfaces::scenario::{Action, ScenarioReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input scenario JSON file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

async fn resolve_actor(users: &UserStoreRef, id: uuid::Uuid) -> storefront::error::Result<Principal> {
    let user = users
        .get(id)
        .await?
        .ok_or_else(|| StoreError::Unauthenticated(format!("unknown user {id}")))?;
    Ok(Principal::from(&user))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Arc::new(AppConfig::from_env());

    let users: UserStoreRef = Arc::new(InMemoryUserStore::new());
    let products = Arc::new(InMemoryProductStore::new());
    let reviews = Arc::new(InMemoryReviewStore::new());
    let cart = Arc::new(InMemoryCartStore::new());

    #[cfg(feature = "storage-rocksdb")]
    let (orders, notifications): (OrderStoreRef, NotificationStoreRef) =
        if let Some(db_path) = &cli.db_path {
            let store = RocksDbStore::open(db_path).into_diagnostic()?;
            (Arc::new(store.clone()), Arc::new(store))
        } else {
            (
                Arc::new(InMemoryOrderStore::new()),
                Arc::new(InMemoryNotificationStore::new()),
            )
        };
    #[cfg(not(feature = "storage-rocksdb"))]
    let (orders, notifications): (OrderStoreRef, NotificationStoreRef) = {
        if cli.db_path.is_some() {
            eprintln!("--db-path ignored: compiled without the storage-rocksdb feature");
        }
        (
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(InMemoryNotificationStore::new()),
        )
    };

    let mailer = Arc::new(LogMailer::new());
    let gateway = Arc::new(SimulatedGateway::always_approve());

    let checkout = CheckoutService::new(
        products.clone(),
        cart.clone(),
        orders.clone(),
        notifications.clone(),
        gateway,
        mailer.clone(),
        config.clone(),
    );
    let status = OrderStatusService::new(
        orders.clone(),
        notifications.clone(),
        users.clone(),
        mailer,
        config,
    );
    let catalog = CatalogService::new(products.clone(), reviews.clone(), orders.clone());

    let file = File::open(&cli.input).into_diagnostic()?;
    let scenario = ScenarioReader::new(file).load().into_diagnostic()?;

    for user in scenario.users {
        users.insert(user).await.into_diagnostic()?;
    }
    for product in scenario.products {
        products.insert(product).await.into_diagnostic()?;
    }
    for review in scenario.reviews {
        reviews.insert(review).await.into_diagnostic()?;
    }
    for item in scenario.cart {
        cart.upsert(item).await.into_diagnostic()?;
    }

    // Orders committed by this run, in action order. `set_status` actions
    // refer to them by index.
    let mut committed: Vec<Order> = Vec::new();

    for action in scenario.actions {
        let result = match action {
            Action::Checkout { actor, request } => match resolve_actor(&users, actor).await {
                Ok(principal) => checkout.place_order(&principal, request).await.map(|order| {
                    committed.push(order);
                }),
                Err(e) => Err(e),
            },
            Action::SetStatus {
                actor,
                order,
                status: new_status,
                tracking_number,
            } => {
                let target = committed.get(order).map(|o| o.id);
                match (resolve_actor(&users, actor).await, target) {
                    (Ok(principal), Some(order_id)) => status
                        .update_status(&principal, order_id, &new_status, tracking_number)
                        .await
                        .map(|_| ()),
                    (Err(e), _) => Err(e),
                    (_, None) => Err(StoreError::not_found(format!("order index {order}"))),
                }
            }
            Action::ResolvePayment {
                reference,
                succeeded,
            } => status.resolve_payment(&reference, succeeded).await.map(|_| ()),
            Action::AddReview { actor, request } => match resolve_actor(&users, actor).await {
                Ok(principal) => catalog.add_review(&principal, request).await.map(|_| ()),
                Err(e) => Err(e),
            },
        };
        if let Err(e) = result {
            eprintln!("Error processing action: {}", e);
        }
    }

    let final_orders = orders.list_all().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &final_orders).into_diagnostic()?;
    writeln!(out).into_diagnostic()?;

    Ok(())
}

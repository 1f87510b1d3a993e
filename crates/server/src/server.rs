use axum::{Router, routing::get};

use std::sync::Arc;

use crate::{budgets, categories, currency, dashboard, health, savings_goals, transactions};
use engine::{Engine, Store};

pub struct ServerState<S: Store> {
    pub engine: Arc<Engine<S>>,
}

impl<S: Store> Clone for ServerState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

/// The `/api` router over any store.
pub fn router<S: Store>(engine: Arc<Engine<S>>) -> Router {
    let state = ServerState { engine };
    let api = Router::new()
        .route(
            "/categories",
            get(categories::list::<S>).post(categories::create::<S>),
        )
        .route("/categories/{id}", get(categories::get::<S>))
        .route(
            "/transactions",
            get(transactions::list::<S>).post(transactions::create::<S>),
        )
        .route(
            "/budgets",
            get(budgets::list::<S>).post(budgets::create::<S>),
        )
        .route(
            "/budgets/{id}",
            get(budgets::get::<S>)
                .put(budgets::update::<S>)
                .delete(budgets::delete::<S>),
        )
        .route(
            "/savings-goals",
            get(savings_goals::list::<S>).post(savings_goals::create::<S>),
        )
        .route(
            "/savings-goals/{id}",
            get(savings_goals::get::<S>)
                .put(savings_goals::update::<S>)
                .delete(savings_goals::delete::<S>),
        )
        .route("/dashboard", get(dashboard::get::<S>))
        .route(
            "/currency",
            get(currency::get::<S>).put(currency::update::<S>),
        )
        .route("/health", get(health::get::<S>))
        .with_state(state);

    Router::new().nest("/api", api)
}

pub async fn run_with_listener<S: Store>(
    engine: Engine<S>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(backend = engine.store().backend(), "Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}

//! Service wiring for the HTTP app.
//!
//! One catalog store (env-switched between the in-memory twin and
//! Postgres) feeds the reconciler, the query service, and the quantity
//! guard. Catalog events are bridged onto a lossy tokio broadcast channel
//! for the SSE endpoint; a slow web client drops messages rather than
//! backpressuring a write.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use houndwear_catalog::{BestSellersChanged, CatalogEvent};
use houndwear_core::ProductId;
use houndwear_events::{Event, EventBus, InMemoryEventBus};
use houndwear_infra::catalog_store::{CatalogStore, InMemoryCatalogStore, PostgresCatalogStore};
use houndwear_infra::guard::StockConstraintGuard;
use houndwear_infra::query::CatalogQueryService;
use houndwear_infra::reconcile::StockReconciler;

/// Realtime message broadcast to SSE clients.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeMessage {
    pub topic: String,
    pub payload: serde_json::Value,
}

type SharedStore = Arc<dyn CatalogStore>;
type SharedBus = Arc<InMemoryEventBus<CatalogEvent>>;

pub struct AppServices {
    pub store: SharedStore,
    pub bus: SharedBus,
    pub reconciler: StockReconciler<SharedStore, SharedBus>,
    pub query: CatalogQueryService<SharedStore>,
    pub guard: StockConstraintGuard<SharedStore>,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl AppServices {
    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }

    /// Announce a best-seller membership change on the catalog bus.
    pub fn publish_best_sellers_changed(&self, product_id: ProductId, featured: bool) {
        let event = CatalogEvent::BestSellersChanged(BestSellersChanged {
            product_id,
            featured,
            occurred_at: chrono::Utc::now(),
        });
        if let Err(e) = self.bus.publish(event) {
            tracing::warn!(error = ?e, "failed to publish catalog event");
        }
    }
}

pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let store: SharedStore = if use_persistent {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
        let store = PostgresCatalogStore::connect(&database_url)
            .await
            .expect("failed to connect to Postgres");
        Arc::new(store)
    } else {
        Arc::new(InMemoryCatalogStore::new())
    };

    build_with_store(store)
}

fn build_with_store(store: SharedStore) -> AppServices {
    let bus: SharedBus = Arc::new(InMemoryEventBus::new());

    // Realtime channel (SSE): lossy broadcast, bounded.
    let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

    // Background subscriber: catalog bus -> SSE broadcast.
    {
        let sub = bus.subscribe();
        let realtime_tx = realtime_tx.clone();
        tokio::task::spawn_blocking(move || {
            loop {
                match sub.recv() {
                    Ok(event) => {
                        let payload = serde_json::to_value(&event)
                            .unwrap_or_else(|_| serde_json::json!({}));
                        let _ = realtime_tx.send(RealtimeMessage {
                            topic: event.event_type().to_string(),
                            payload,
                        });
                    }
                    Err(_) => break,
                }
            }
        });
    }

    AppServices {
        reconciler: StockReconciler::new(Arc::clone(&store), Arc::clone(&bus)),
        query: CatalogQueryService::new(Arc::clone(&store)),
        guard: StockConstraintGuard::new(Arc::clone(&store)),
        store,
        bus,
        realtime_tx,
    }
}

/// SSE stream over catalog change notifications.
pub fn catalog_sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(m) => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

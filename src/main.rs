use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_sim::api::state::AppState;
use exchange_sim::config::AppConfig;
use exchange_sim::demo::{ChaosEngine, ChaosState, DemoOrchestrator};
use exchange_sim::matching::engine::{MatchingEngine, MetricsEngine, TradingEngine};
use exchange_sim::matching::executor::{BasicExecutor, MetricsDecoratedExecutor};
use exchange_sim::metrics::{prometheus, MetricsCollector, MetricsService};
use exchange_sim::repository::{OrderRepository, TradeRepository};
use exchange_sim::simulation::{MarketSimulator, SimulatorConfig};
use exchange_sim::{api, matching};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exchange_sim=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load();
    tracing::info!(?config, "starting exchange-sim");

    // Composition root: repositories -> engine -> decorators -> simulator
    // -> demo orchestrator -> router (spec.md S9 "explicit builder").
    let order_repo = Arc::new(OrderRepository::new());
    let trade_repo = Arc::new(TradeRepository::new());

    let collector = Arc::new(MetricsCollector::new(config.metrics_window));
    let metrics_service = Arc::new(MetricsService::new(collector.clone(), Duration::from_secs(5)));
    if config.metrics_enabled {
        metrics_service.start();
        let _ = prometheus::init_metrics();
    }

    let executor: Box<dyn matching::executor::TradeExecutor> = if config.metrics_enabled {
        Box::new(MetricsDecoratedExecutor::new(
            Box::new(BasicExecutor::new(trade_repo.clone())),
            collector.clone(),
        ))
    } else {
        Box::new(BasicExecutor::new(trade_repo.clone()))
    };

    let base_engine: Box<dyn TradingEngine> = Box::new(MatchingEngine::new(order_repo.clone(), executor));
    let metrics_engine: Box<dyn TradingEngine> = if config.metrics_enabled {
        Box::new(MetricsEngine::new(base_engine, collector.clone()))
    } else {
        base_engine
    };

    let chaos = Arc::new(ChaosState::default());
    let engine: Arc<dyn TradingEngine> = Arc::new(ChaosEngine::new(metrics_engine, chaos.clone()));

    let simulator = Arc::new(MarketSimulator::new(
        engine.clone(),
        SimulatorConfig {
            symbols: config.symbols.clone(),
            ..Default::default()
        },
    ));
    if config.simulation_enabled {
        simulator.start();
    }

    let demo = DemoOrchestrator::new(simulator.clone(), collector.clone(), chaos.clone());

    let state = Arc::new(AppState {
        engine,
        metrics: metrics_service,
        simulator,
        demo,
        chaos,
    });

    let app = api::routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

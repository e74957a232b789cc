use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use futures_util::future::BoxFuture;
use tracing::{info, warn};

use morningbrief_briefing::{ChannelError, Coordinator, DeliveryChannel};
use morningbrief_core::MorningBriefConfig;
use morningbrief_pipeline::{
    mock::MockProvider, openai::OpenAiProvider, ContentPipeline, LlmProvider, NewsBriefingPipeline,
    NewsClient,
};
use morningbrief_scheduler::{DailyTime, ScheduleRegistry, SchedulerEngine, TriggerSet};
use morningbrief_store::PreferenceStore;
use morningbrief_telegram::{TelegramAdapter, TelegramAppContext, TelegramChannel};

mod app;
mod http;

#[derive(Parser)]
#[command(name = "morningbrief-gateway", about = "MorningBrief news-briefing bot")]
struct Args {
    /// Path to morningbrief.toml (default: ~/.morningbrief/morningbrief.toml).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = MorningBriefConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        MorningBriefConfig::default()
    });

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");
    let store = PreferenceStore::new(
        rusqlite::Connection::open(db_path)?,
        config.categories.max_per_user,
    )?;

    // Scheduler: shared trigger set, registry for per-subscriber jobs,
    // engine for the background loop.
    let triggers = TriggerSet::new();
    let registry = Arc::new(ScheduleRegistry::new(triggers.clone()));
    let engine = SchedulerEngine::new(triggers.clone());

    // Content pipeline: news source + LLM provider from config.
    let llm = build_llm_provider(&config);
    let news = NewsClient::new(
        config.news.api_key.clone(),
        config.news.base_url.clone(),
        config.news.articles_per_category,
    );
    let pipeline: Arc<dyn ContentPipeline> = Arc::new(NewsBriefingPipeline::new(
        news,
        llm,
        config.news.top_per_category,
    ));

    // Delivery channel: Telegram when configured, otherwise a log-only sink.
    let bot = config
        .telegram
        .as_ref()
        .map(|t| teloxide::Bot::new(&t.bot_token));
    let channel: Arc<dyn DeliveryChannel> = match &bot {
        Some(bot) => Arc::new(TelegramChannel::new(bot.clone())),
        None => {
            warn!("no Telegram token configured — scheduled briefings will only be logged");
            Arc::new(LogChannel)
        }
    };

    let coordinator = Coordinator::new(
        store.clone(),
        Arc::clone(&registry),
        Arc::clone(&pipeline),
        channel,
    );

    // Rebuild the per-subscriber schedules from the store.
    let synced = coordinator.sync_all();
    info!(synced, "startup schedule sync complete");

    // Global daily refresh warms the pipeline for every configured category.
    install_news_refresh(&triggers, &config, Arc::clone(&pipeline))?;

    // Engine loop in the background until shutdown.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(engine.run(shutdown_rx));

    // Telegram adapter, when configured.
    if let Some(bot) = bot {
        let ctx = Arc::new(TelegramAppContext {
            store: store.clone(),
            coordinator: Arc::clone(&coordinator),
            available_categories: config.categories.available.clone(),
        });
        tokio::spawn(TelegramAdapter::new(bot, ctx).run());
        info!("Telegram bot started");
    }

    let state = Arc::new(app::AppState {
        config: config.clone(),
        store,
        registry,
        pipeline,
    });
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    info!("MorningBrief gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // Teardown: stop the engine loop and cancel every live schedule.
    let _ = shutdown_tx.send(true);
    coordinator.shutdown();
    Ok(())
}

/// Pick the LLM provider from config.
///
/// Falls back to the deterministic mock provider when no key is set, so the
/// process still starts (selection and summaries degrade gracefully).
fn build_llm_provider(config: &MorningBriefConfig) -> Arc<dyn LlmProvider> {
    let llm = &config.llm;
    if llm.provider == "mock" || llm.api_key.is_empty() {
        warn!("no LLM API key configured — using mock provider");
        return Arc::new(MockProvider);
    }
    match llm.provider.as_str() {
        "openai" => {
            info!(model = %llm.model, "LLM provider: OpenAI");
            Arc::new(OpenAiProvider::new(
                llm.api_key.clone(),
                llm.model.clone(),
                llm.base_url.clone(),
            ))
        }
        "openrouter" => {
            info!(model = %llm.model, "LLM provider: OpenRouter");
            Arc::new(OpenAiProvider::openrouter(
                llm.api_key.clone(),
                llm.model.clone(),
                llm.base_url.clone(),
            ))
        }
        other => {
            warn!(provider = %other, "unknown LLM provider — using mock");
            Arc::new(MockProvider)
        }
    }
}

/// Register the daily all-categories refresh trigger.
fn install_news_refresh(
    triggers: &TriggerSet,
    config: &MorningBriefConfig,
    pipeline: Arc<dyn ContentPipeline>,
) -> anyhow::Result<()> {
    let time = DailyTime::new(config.scheduler.refresh_hour, config.scheduler.refresh_minute)?;
    let categories = config.categories.available.clone();

    triggers.add(
        "news_refresh",
        time,
        Arc::new(move |_chat_id: String| -> BoxFuture<'static, ()> {
            let pipeline = Arc::clone(&pipeline);
            let categories = categories.clone();
            Box::pin(async move {
                info!("starting daily news refresh");
                match pipeline.produce_briefing(&categories).await {
                    Ok(result) => {
                        info!(articles = result.articles.len(), "daily news refresh complete")
                    }
                    Err(e) => warn!(error = %e, "daily news refresh failed"),
                }
            })
        }),
    )?;
    info!(time = %time, "daily news refresh scheduled");
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}

/// Log-only sink used when no messaging channel is configured.
struct LogChannel;

#[async_trait::async_trait]
impl DeliveryChannel for LogChannel {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        info!(chat_id, chars = text.len(), "briefing ready (no delivery channel configured)");
        Ok(())
    }
}

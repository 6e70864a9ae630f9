use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alphapredict_dash::analytics::{fetch_snapshot, Thresholds};
use alphapredict_dash::comparison::compare_to_segment;
use alphapredict_dash::config::Config;
use alphapredict_dash::errors::{AppError, ResultExt};
use alphapredict_dash::format::{format_currency, format_percent};
use alphapredict_dash::gateway_client::GatewayClient;
use alphapredict_dash::models::SearchFilter;
use alphapredict_dash::prediction::{
    factor_attributions, fetch_envelope, validate_client_id, PredictionSession,
};
use alphapredict_dash::views;

/// Terminal dashboard for AlphaPredict income predictions.
#[derive(Parser)]
#[command(name = "alphapredict-dash", version)]
struct Cli {
    /// Override the backend base URL (defaults to API_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Quick search: resolve the best-match client for a query.
    Search {
        /// Client ID or part of a name.
        query: String,
    },
    /// List or filter the client roster.
    Clients {
        /// Free-text query.
        #[arg(long)]
        query: Option<String>,
        /// Segment label, "all" for no filter.
        #[arg(long)]
        segment: Option<String>,
        /// Region label, "all" for no filter.
        #[arg(long)]
        region: Option<String>,
    },
    /// Show a client profile with prediction and segment comparison.
    Client {
        /// Client identifier.
        id: String,
    },
    /// Show the model-monitoring and business-metrics page.
    Analytics,
    /// Request a fresh income prediction for a client.
    Predict {
        /// Client identifier.
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alphapredict_dash=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url;
    }

    let gateway = GatewayClient::new(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .map_err(|e| anyhow::anyhow!("failed to initialize gateway: {}", e))?;

    match cli.command {
        Command::Search { query } => run_search(&gateway, &query).await,
        Command::Clients {
            query,
            segment,
            region,
        } => run_clients(&gateway, query, segment, region).await,
        Command::Client { id } => run_client(&gateway, &id).await,
        Command::Analytics => run_analytics(&gateway).await,
        Command::Predict { id } => run_predict(&gateway, &id).await,
    }

    Ok(())
}

async fn run_search(gateway: &GatewayClient, query: &str) {
    // The landing page shows the headline stats above the quick search.
    print!("{}", views::render_dashboard_stats());
    match gateway.search_best_match(query).await {
        Ok(best_match) => print!("{}", views::render_search_result(best_match.as_ref())),
        Err(AppError::BadRequest(msg)) => println!("{}", msg),
        Err(e) => {
            tracing::error!("Search error: {}", e);
            println!("Ошибка поиска");
        }
    }
}

async fn run_clients(
    gateway: &GatewayClient,
    query: Option<String>,
    segment: Option<String>,
    region: Option<String>,
) {
    let filtered = query.is_some() || segment.is_some() || region.is_some();
    let result = if filtered {
        let filter = SearchFilter {
            query,
            segment,
            region,
        };
        gateway.search_clients(&filter).await
    } else {
        gateway.list_clients().await
    };

    // A failed roster load degrades to the empty state, not an error page.
    let clients = result.context("loading client roster").unwrap_or_else(|e| {
        tracing::error!("{}", e);
        Vec::new()
    });
    print!("{}", views::render_client_list(&clients));
}

async fn run_client(gateway: &GatewayClient, id: &str) {
    match gateway.get_client(id).await {
        Ok(client) => {
            let envelope = fetch_envelope(gateway, &client.id, Some(client.income)).await;
            let comparison = compare_to_segment(client.income, client.segment);
            print!(
                "{}",
                views::render_client_profile(
                    &client,
                    &envelope,
                    &comparison,
                    &factor_attributions()
                )
            );
        }
        Err(AppError::NotFound(_)) => print!("{}", views::render_not_found()),
        Err(e) => {
            tracing::error!("Error loading client: {}", e);
            print!("{}", views::render_not_found());
        }
    }
}

async fn run_analytics(gateway: &GatewayClient) {
    let (snapshot, provenance) = fetch_snapshot(gateway).await;
    print!(
        "{}",
        views::render_analytics(&snapshot, provenance, &Thresholds::default())
    );
}

async fn run_predict(gateway: &GatewayClient, id: &str) {
    if let Err(AppError::BadRequest(msg)) = validate_client_id(id) {
        println!("{}", msg);
        return;
    }

    // Current income feeds the placeholder path when the backend is down.
    let current_income = match gateway.get_client(id).await {
        Ok(client) => Some(client.income),
        Err(e) => {
            tracing::warn!("Client {} unavailable before prediction: {}", id, e);
            None
        }
    };

    let session = PredictionSession::new();
    if let Some(envelope) = session.refresh(gateway, id, current_income).await {
        println!(
            "Прогноз дохода: {} ({})",
            format_currency(envelope.predicted_income),
            envelope.provenance.label()
        );
        println!(
            "Диапазон: {} - {}",
            format_currency(envelope.confidence_interval.min),
            format_currency(envelope.confidence_interval.max)
        );
        println!(
            "Доверительный интервал: {}",
            format_percent(envelope.confidence * 100.0, 0)
        );
        if !envelope.factors.is_empty() {
            println!("Ключевые факторы: {}", envelope.factors.join(", "));
        }
    }
}

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use candidate_scorer::config::{LoggingSettings, Settings};
use candidate_scorer::core::{
    BatchOptions, CandidateScorer, ResilientSimilarity, SkillSimilarity,
};
use candidate_scorer::routes::{self, evaluations::AppState, handle_json_payload_error};
use candidate_scorer::services::{
    load_reference_profiles, load_requirements, CachedSimilarity, SemanticSimilarityClient,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{context}: {e}"))
}

/// Remote backend behind the result cache when enabled and keyed, lexical otherwise
fn build_similarity(settings: &Settings) -> ResilientSimilarity {
    let similarity = &settings.similarity;

    let Some(api_key) = similarity.active_key() else {
        info!("Semantic similarity disabled, using lexical matching");
        return ResilientSimilarity::lexical_only();
    };

    let client = match SemanticSimilarityClient::new(
        similarity.endpoint.clone(),
        api_key.to_string(),
        similarity.model.clone(),
        similarity.timeout(),
        similarity.max_skills_per_list,
    ) {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build similarity client ({}), using lexical matching", e);
            return ResilientSimilarity::lexical_only();
        }
    };

    let cached: Arc<dyn SkillSimilarity> = Arc::new(CachedSimilarity::new(
        Arc::new(client),
        settings.cache.capacity,
        settings.cache.ttl_secs,
    ));

    info!(
        "Semantic similarity enabled ({} via {}, cache: {} entries, TTL: {}s)",
        similarity.model, similarity.endpoint, settings.cache.capacity, settings.cache.ttl_secs
    );

    // outer bound sits above the client's own timeout
    ResilientSimilarity::new(cached, similarity.timeout() + Duration::from_secs(1))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);
    info!("Starting candidate scoring service...");

    let requirements = load_requirements(&settings.session.requirements_path)
        .map_err(|e| startup_error("Failed to load requirements", e))?;
    let reference = load_reference_profiles(&settings.session.reference_profiles_path)
        .map_err(|e| startup_error("Failed to load reference profiles", e))?;

    let similarity = build_similarity(&settings);

    let scorer = CandidateScorer::from_reference(
        requirements,
        reference.iter().map(|entry| &entry.profile),
        similarity,
    )
    .map_err(|e| startup_error("Cannot start scoring session", e))?;

    info!(
        "Baseline computed from {} reference profiles ({} excluded)",
        scorer.baseline().total_profiles,
        scorer.baseline().excluded_profiles
    );

    let app_state = AppState {
        scorer: Arc::new(scorer),
        batch: BatchOptions {
            workers: settings.batch.workers,
            pacing: Duration::from_millis(settings.batch.pacing_ms),
        },
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(
                web::JsonConfig::default()
                    .limit(4 * 1024 * 1024)
                    .error_handler(handle_json_payload_error),
            )
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

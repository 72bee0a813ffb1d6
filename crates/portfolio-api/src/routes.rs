use crate::{ai_handlers, analytics_handlers, handlers, learning_handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))

        // Upstream-backed reads
        .route("/api/github/stats", get(handlers::github_stats))
        .route("/api/leetcode/stats", get(handlers::leetcode_stats))
        .route("/api/medium/posts", get(handlers::medium_posts))
        .route("/api/spotify/now-playing", get(handlers::spotify_now_playing))

        // AI advisors
        .route("/api/ai/learning-suggestions", post(ai_handlers::learning_suggestions))
        .route("/api/ai/companion", post(ai_handlers::companion))
        .route("/api/ai/progress-analysis", post(ai_handlers::progress_analysis))

        // Visitor analytics
        .route(
            "/api/analytics/visitors",
            get(analytics_handlers::visitor_counts).post(analytics_handlers::record_visit),
        )

        // Learning
        .route(
            "/api/learning/journal",
            get(learning_handlers::journal_overview).post(learning_handlers::save_journal_entry),
        )
        .route(
            "/api/learning/stats",
            get(learning_handlers::learning_stats).post(learning_handlers::log_learning_activity),
        )

        // Add state
        .with_state(state)

        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

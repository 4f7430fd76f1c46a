//! # Módulo Web — A Superfície HTTP do Chat
//!
//! Camada fina sobre o [`ChatPipeline`](crate::nlu::ChatPipeline),
//! construída com **Axum** + **tower-http**.
//!
//! ## Arquitetura Web
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Cliente (app mobile, curl, ...)                      │
//! ├──────────────────────────────────────────────────────┤
//! │ tower-http: TraceLayer (spans por request) + CORS    │
//! ├──────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                            │
//! │  ├── POST /chat     → {"response": ...}              │
//! │  ├── POST /predict  → intents ranqueados             │
//! │  └── GET  /status   → resumo do modelo carregado     │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submódulos
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Contexto compartilhado (`AppState`) |
//! | [`handlers`] | Handlers Axum para cada rota |

pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Cria o router Axum com todas as rotas da aplicação.
///
/// CORS é permissivo (qualquer origem), como no serviço que este
/// substitui: o cliente principal é um app mobile/web de outro domínio.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/predict", post(handlers::predict))
        .route("/status", get(handlers::status))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

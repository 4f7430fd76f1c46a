//! # Estado da Aplicação Web
//!
//! O [`AppState`] é o contexto explícito da aplicação: construído uma vez
//! no `main` (depois que os artefatos carregaram) e clonado pelo Axum para
//! cada handler. Clonar custa um incremento de `Arc`.
//!
//! ```text
//! main()
//!   ├── load_pipeline() ──→ ChatPipeline
//!   └── AppState { pipeline: Arc<ChatPipeline> }
//!            ↓ State<AppState>
//!        handlers (somente leitura, sem locks)
//! ```

use std::sync::Arc;

use crate::nlu::ChatPipeline;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline NLU imutável, compartilhado entre todas as requisições.
    pub pipeline: Arc<ChatPipeline>,
}

impl AppState {
    pub fn new(pipeline: ChatPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

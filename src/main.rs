//! # Intent Chat — Servidor de Respostas por Classificação de Intents
//!
//! **Ponto de entrada principal** da aplicação.
//!
//! Recebe mensagens livres em `POST /chat`, classifica a mensagem contra um
//! conjunto fixo de intents com um modelo já treinado e devolve uma das
//! respostas-modelo associadas ao intent de maior confiança.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Lê configuração (flags + variáveis de ambiente)
//!   ├── Configura tracing/logging
//!   ├── Carrega artefatos (words, classes, intents, pesos)
//!   │     └── qualquer falha → processo encerra com erro
//!   ├── Monta AppState e Router
//!   └── Inicia servidor TCP
//! ```
//!
//! Diferente de um carregamento em background, aqui o modelo é pequeno e
//! obrigatório: o socket só abre depois que o pipeline está pronto.
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Executar com logs padrão (info)
//! cargo run -- --data-dir data/
//!
//! # Executar com logs detalhados
//! RUST_LOG=debug cargo run
//!
//! curl -X POST localhost:5000/chat \
//!      -H 'content-type: application/json' \
//!      -d '{"message": "hello"}'
//! ```

/// Módulo `artifacts` — carregamento e validação dos arquivos do modelo.
mod artifacts;

/// Módulo `config` — flags de linha de comando e variáveis de ambiente.
mod config;

/// Módulo `nlu` — normalização, bag-of-words, classificador, resolução e resposta.
mod nlu;

/// Módulo `web` — servidor axum e handlers HTTP.
mod web;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::nlu::intent::IntentResolver;
use crate::web::state::AppState;

/// Função principal assíncrona.
///
/// # Erros
///
/// Retorna erro (e o processo encerra com código ≠ 0) se:
/// - Algum artefato não puder ser carregado ou validado
/// - Não conseguir fazer bind no endereço configurado
/// - O servidor axum falhar durante execução
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // RUST_LOG tem precedência; sem ele, --debug escolhe entre info e debug.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .init();

    tracing::info!("Intent Chat — Starting...");

    let paths = config.artifact_paths();
    tracing::info!(data_dir = %config.data_dir.display(), "Loading artifacts...");
    let pipeline = artifacts::load_pipeline(&paths, IntentResolver::new(config.threshold))
        .context("Failed to load model artifacts")?;

    let app = web::create_router(AppState::new(pipeline));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!("Server running at http://{}", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}

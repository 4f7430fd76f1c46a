//! # Handlers HTTP — Os Endpoints da Aplicação
//!
//! Cada função pública neste módulo é um handler Axum, mapeado a uma
//! rota em [`super::create_router()`]. Todos falam JSON.
//!
//! | Handler | Método | Rota | Retorno |
//! |---------|--------|------|---------|
//! | `chat` | POST | `/chat` | `{"response": str}` |
//! | `predict` | POST | `/predict` | `{"intents": [{"intent", "probability"}]}` |
//! | `status` | GET | `/status` | `{"ready", "vocabulary", "intents", "threshold"}` |
//!
//! ## Corpo da Requisição
//!
//! `message` é opcional e tolerante: ausente, `null` ou de outro tipo JSON
//! vira string vazia, que cai no fallback. JSON malformado continua sendo
//! rejeitado pelo extrator `Json` do Axum.
//!
//! ## Falhas Internas
//!
//! Um erro do pipeline vira [`ApiError`] → HTTP 500 com corpo fixo
//! `{"error": "internal error"}`; a cadeia completa do erro só vai para o log.
//! Não há retry.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};

use super::state::AppState;
use crate::nlu::intent::Prediction;

/// Corpo de `/chat` e `/predict`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// Texto do usuário; qualquer coisa que não seja string vira `""`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
}

/// Aceita qualquer valor JSON; só strings são aproveitadas.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// Resposta de `/chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Resposta de `/predict` — os intents confiáveis, ranqueados.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub intents: Vec<Prediction>,
}

/// Resposta do endpoint `/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Sempre `true`: o servidor só sobe depois que os artefatos carregaram.
    pub ready: bool,
    /// Tamanho do vocabulário (dimensão do vetor de features).
    pub vocabulary: usize,
    /// Número de intents no label set.
    pub intents: usize,
    /// Threshold de confiança em uso.
    pub threshold: f32,
}

/// Falha interna de um handler → HTTP 500.
pub struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %format!("{:#}", self.0), "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "internal error" })),
        )
            .into_response()
    }
}

/// POST `/chat` — Classifica a mensagem e devolve uma resposta do intent.
///
/// ## Fluxo
///
/// ```text
/// 1. Extrai "message" (ausente → "")
/// 2. pipeline.respond() — normaliza, vetoriza, classifica, resolve
/// 3. Sorteia a resposta com o RNG da thread
/// 4. Devolve {"response": ...}
/// ```
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let response = state.pipeline.respond(&request.message, &mut rand::rng())?;
    Ok(Json(ChatResponse { response }))
}

/// POST `/predict` — Só a classificação, sem escolher resposta.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let intents = state.pipeline.predict(&request.message)?;
    Ok(Json(PredictResponse { intents }))
}

/// GET `/status` — Sonda de prontidão com um resumo do modelo carregado.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        ready: true,
        vocabulary: state.pipeline.vocabulary_len(),
        intents: state.pipeline.label_count(),
        threshold: state.pipeline.threshold(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_optional_and_lenient() {
        let parse = |json: &str| serde_json::from_str::<ChatRequest>(json).unwrap().message;
        assert_eq!(parse(r#"{"message": "hello"}"#), "hello");
        assert_eq!(parse(r#"{}"#), "");
        assert_eq!(parse(r#"{"message": null}"#), "");
        assert_eq!(parse(r#"{"message": 42}"#), "");
        assert_eq!(parse(r#"{"message": ["hi"], "extra": true}"#), "");
    }
}

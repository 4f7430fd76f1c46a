//! # Seletor de Respostas
//!
//! Escolhe a resposta final a partir dos intents ranqueados:
//!
//! | Situação | Resposta |
//! |----------|----------|
//! | Nenhum intent acima do threshold | [`FALLBACK_RESPONSE`] |
//! | Intent do topo sem entrada na tabela | [`FALLBACK_RESPONSE`] + `warn` |
//! | Intent do topo com lista de respostas vazia | [`FALLBACK_RESPONSE`] + `warn` |
//! | Caso normal | uma resposta do intent do topo, sorteio uniforme |
//!
//! A fonte de aleatoriedade é injetada: com um `StdRng` semeado, a mesma
//! entrada produz sempre a mesma resposta.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::intent::{IntentTable, Prediction};

/// Resposta padrão quando não há intent confiável.
pub const FALLBACK_RESPONSE: &str = "I'm not sure I understand. Try again.";

/// Seleciona uma resposta para o intent de maior confiança.
pub fn select_response<R: Rng + ?Sized>(
    predictions: &[Prediction],
    table: &IntentTable,
    rng: &mut R,
) -> String {
    let Some(top) = predictions.first() else {
        return FALLBACK_RESPONSE.to_string();
    };

    let Some(responses) = table.responses(&top.tag) else {
        tracing::warn!(tag = %top.tag, "Top intent has no entry in the intent table");
        return FALLBACK_RESPONSE.to_string();
    };

    match responses.choose(rng) {
        Some(response) => response.clone(),
        None => {
            tracing::warn!(tag = %top.tag, "Top intent has no responses configured");
            FALLBACK_RESPONSE.to_string()
        }
    }
}

//! # Erros de Consistência dos Artefatos
//!
//! Falhas estruturais detectadas ao montar o pipeline: vocabulário com
//! duplicatas, pesos incompletos, dimensões que não casam. Todas são fatais
//! no startup.

use thiserror::Error;

/// Inconsistências estruturais nos artefatos carregados.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("vocabulary contains duplicate token {0:?}")]
    DuplicateToken(String),

    #[error("classifier weights are missing tensor {0:?}")]
    MissingTensor(String),

    #[error("classifier layer {layer}: bias has {actual} entries, expected {expected}")]
    BiasShape {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    #[error("classifier layer {layer}: takes {actual} inputs but previous layer produces {expected}")]
    LayerChain {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    #[error("classifier weights contain no dense layers")]
    EmptyModel,

    #[error("classifier expects {model} features but the vocabulary has {vocabulary} words")]
    InputMismatch { model: usize, vocabulary: usize },

    #[error("classifier produces {model} scores but the label set has {labels} intents")]
    OutputMismatch { model: usize, labels: usize },
}

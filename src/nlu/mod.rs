//! # Pipeline NLU — Da Mensagem à Resposta
//!
//! O [`ChatPipeline`] encadeia, de forma síncrona, todas as etapas de
//! compreensão da mensagem do usuário:
//!
//! ```text
//! Mensagem do usuário
//!   ├── 1. Normalizer    → tokens lowercase lematizados
//!   ├── 2. Vectorizer    → vetor bag-of-words {0,1}^|vocab|
//!   ├── 3. Classifier    → um score por label (forward pass)
//!   ├── 4. Resolver      → (tag, score) > threshold, decrescente
//!   └── 5. Responder     → resposta do intent do topo (ou fallback)
//! ```
//!
//! Nada aqui é mutável depois da construção: o pipeline é montado uma vez
//! no startup e compartilhado via `Arc` entre todas as requisições.
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`normalizer`] | Tokenização + lowercase + lematização |
//! | [`vectorizer`] | Vocabulário e codificação bag-of-words |
//! | [`classifier`] | Trait `Classifier` + MLP em candle |
//! | [`intent`] | Label set, tabela de respostas, resolução por threshold |
//! | [`responder`] | Escolha aleatória da resposta / fallback |
//! | [`error`] | `ArtifactError` — inconsistências fatais no startup |

/// Sub-módulo do classificador (trait + MLP candle).
pub mod classifier;

/// Sub-módulo dos erros de consistência dos artefatos.
pub mod error;

/// Sub-módulo dos dados de intent e do resolver por threshold.
pub mod intent;

/// Sub-módulo do tokenizador/lematizador.
pub mod normalizer;

/// Sub-módulo do seletor de respostas.
pub mod responder;

/// Sub-módulo do vocabulário e codificação bag-of-words.
pub mod vectorizer;

use anyhow::Result;
use rand::Rng;

pub use error::ArtifactError;

use classifier::Classifier;
use intent::{IntentResolver, IntentTable, LabelSet, Prediction};
use normalizer::Normalizer;
use vectorizer::{Vectorizer, Vocabulary};

/// Pipeline completo de classificação e resposta.
///
/// Thread-safe por construção: todos os campos são imutáveis e o
/// classificador é `Send + Sync`.
pub struct ChatPipeline {
    normalizer: Normalizer,
    vectorizer: Vectorizer,
    classifier: Box<dyn Classifier>,
    labels: LabelSet,
    table: IntentTable,
    resolver: IntentResolver,
}

impl ChatPipeline {
    /// Monta o pipeline, validando que o classificador casa com o
    /// vocabulário (entrada) e com o label set (saída).
    ///
    /// # Erros
    ///
    /// [`ArtifactError::InputMismatch`] ou [`ArtifactError::OutputMismatch`]
    /// se as dimensões não baterem.
    pub fn new(
        vocabulary: Vocabulary,
        labels: LabelSet,
        table: IntentTable,
        classifier: Box<dyn Classifier>,
        resolver: IntentResolver,
    ) -> Result<Self, ArtifactError> {
        if classifier.input_dim() != vocabulary.len() {
            return Err(ArtifactError::InputMismatch {
                model: classifier.input_dim(),
                vocabulary: vocabulary.len(),
            });
        }
        if classifier.output_dim() != labels.len() {
            return Err(ArtifactError::OutputMismatch {
                model: classifier.output_dim(),
                labels: labels.len(),
            });
        }
        for tag in labels.iter().filter(|tag| !table.contains(tag)) {
            tracing::warn!(tag, "Label has no entry in the intent table; it will answer with the fallback");
        }

        Ok(Self {
            normalizer: Normalizer::new(vocabulary.iter()),
            vectorizer: Vectorizer::new(vocabulary),
            classifier,
            labels,
            table,
            resolver,
        })
    }

    /// Classifica o texto e retorna os intents confiáveis, ranqueados.
    ///
    /// Vetor vazio significa "nenhum intent acima do threshold".
    pub fn predict(&self, text: &str) -> Result<Vec<Prediction>> {
        let tokens = self.normalizer.tokens(text);
        let features = self.vectorizer.encode(tokens.as_slice());
        let scores = self.classifier.predict(&features)?;
        let predictions = self.resolver.resolve(&scores, &self.labels);
        tracing::debug!(
            tokens = ?tokens,
            known = features.iter().filter(|&&x| x > 0.0).count(),
            predictions = ?predictions,
            "Mensagem classificada"
        );
        Ok(predictions)
    }

    /// Executa o pipeline completo e devolve a resposta final.
    pub fn respond<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<String> {
        let predictions = self.predict(text)?;
        Ok(responder::select_response(&predictions, &self.table, rng))
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vectorizer.dim()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn threshold(&self) -> f32 {
        self.resolver.threshold()
    }
}

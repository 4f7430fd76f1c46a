//! # Artefatos — Carregamento do Modelo Treinado no Startup
//!
//! Lê, uma única vez, os quatro arquivos produzidos pelo treino e monta o
//! [`ChatPipeline`]:
//!
//! | Artefato | Arquivo padrão | Formato |
//! |----------|----------------|---------|
//! | Vocabulário | `words.json` | `["hello", "hi", ...]` |
//! | Label set | `classes.json` | `["goodbye", "greeting", ...]` |
//! | Tabela de intents | `intents.json` | `{"intents": [{"tag", "patterns", "responses"}]}` |
//! | Classificador | `model.safetensors` | camadas `dense_{i}.weight` / `dense_{i}.bias` |
//!
//! ## Falhas
//!
//! Qualquer falha aqui é **fatal**: arquivo ausente, JSON corrompido ou
//! dimensões inconsistentes impedem o servidor de subir. Não há modo
//! degradado.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::nlu::classifier::MlpClassifier;
use crate::nlu::intent::{IntentResolver, IntentTable, IntentsFile, LabelSet};
use crate::nlu::vectorizer::Vocabulary;
use crate::nlu::{ArtifactError, ChatPipeline};

/// Localização dos artefatos no disco.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub words: PathBuf,
    pub classes: PathBuf,
    pub intents: PathBuf,
    pub model: PathBuf,
}

/// Lê e desserializa um arquivo JSON, com contexto no erro.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Carrega todos os artefatos e monta o pipeline pronto para uso.
///
/// # Erros
///
/// Retorna erro se qualquer arquivo faltar, estiver corrompido, ou se o
/// classificador não casar com o vocabulário / label set.
pub fn load_pipeline(paths: &ArtifactPaths, resolver: IntentResolver) -> Result<ChatPipeline> {
    let words: Vec<String> = read_json(&paths.words)?;
    let vocabulary = Vocabulary::new(words)
        .with_context(|| format!("Invalid vocabulary in {}", paths.words.display()))?;
    anyhow::ensure!(!vocabulary.is_empty(), "{} contains no words", paths.words.display());

    let labels = LabelSet::new(read_json(&paths.classes)?);
    anyhow::ensure!(!labels.is_empty(), "{} contains no intent labels", paths.classes.display());

    let intents: IntentsFile = read_json(&paths.intents)?;
    let table = IntentTable::from_entries(intents.intents);
    if table.is_empty() {
        tracing::warn!(path = %paths.intents.display(), "Intent table is empty; every reply will be the fallback");
    }

    let classifier = MlpClassifier::load(&paths.model)?;

    tracing::info!(
        words = vocabulary.len(),
        labels = labels.len(),
        intents = table.len(),
        threshold = resolver.threshold(),
        "Artifacts loaded"
    );

    let pipeline = ChatPipeline::new(vocabulary, labels, table, Box::new(classifier), resolver)
        .context("Classifier does not match the vocabulary/label files")?;
    Ok(pipeline)
}

//! # Intents — Label Set, Tabela de Respostas e Resolução por Confiança
//!
//! Este módulo reúne os dados estáticos sobre intents e a etapa que converte
//! os scores crus do classificador em candidatos ranqueados:
//!
//! | Tipo | Papel |
//! |------|-------|
//! | [`LabelSet`] | Tags de intent, alinhadas por índice com a saída do modelo |
//! | [`IntentTable`] | Tag → respostas candidatas (de `intents.json`) |
//! | [`Prediction`] | Par (tag, confiança) acima do threshold |
//! | [`IntentResolver`] | Filtra por threshold e ordena por confiança |
//!
//! ## Resolução
//!
//! ```text
//! scores: [0.02, 0.95, 0.03]      labels: [goodbye, greeting, thanks]
//!           ↓ score > 0.7 (estrito)
//! [(greeting, 0.95)]
//!           ↓ ordenação estável, decrescente
//! Vec<Prediction>   (vazio = "nenhum intent confiável", não é erro)
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Threshold padrão de confiança.
pub const DEFAULT_THRESHOLD: f32 = 0.7;

/// Tags de intent na ordem das dimensões de saída do classificador.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

/// Entrada do arquivo `intents.json`.
///
/// `patterns` são as frases de treino; não participam da inferência, mas
/// são aceitas para que o mesmo arquivo sirva ao treino e ao serviço.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentEntry {
    pub tag: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub responses: Vec<String>,
}

/// Documento `intents.json` completo: `{"intents": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentsFile {
    pub intents: Vec<IntentEntry>,
}

/// Tabela estática tag → respostas candidatas.
///
/// Se uma tag aparecer mais de uma vez no arquivo, vale a primeira ocorrência.
#[derive(Debug, Clone, Default)]
pub struct IntentTable {
    responses: HashMap<String, Vec<String>>,
}

impl IntentTable {
    /// Monta a tabela a partir das entradas do arquivo, na ordem em que aparecem.
    pub fn from_entries(entries: Vec<IntentEntry>) -> Self {
        let patterns: usize = entries.iter().map(|e| e.patterns.len()).sum();
        tracing::debug!(entries = entries.len(), patterns, "Building intent table");

        let mut responses = HashMap::with_capacity(entries.len());
        for entry in entries {
            if responses.contains_key(&entry.tag) {
                tracing::warn!(tag = %entry.tag, "Duplicate intent tag, keeping the first entry");
                continue;
            }
            responses.insert(entry.tag, entry.responses);
        }
        Self { responses }
    }

    /// Respostas da tag, ou `None` se a tag não existir na tabela.
    pub fn responses(&self, tag: &str) -> Option<&[String]> {
        self.responses.get(tag).map(Vec::as_slice)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.responses.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/// Intent candidato com sua confiança.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    #[serde(rename = "intent")]
    pub tag: String,
    #[serde(rename = "probability")]
    pub confidence: f32,
}

/// Filtra scores pelo threshold e ordena os sobreviventes.
#[derive(Debug, Clone, Copy)]
pub struct IntentResolver {
    threshold: f32,
}

impl Default for IntentResolver {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl IntentResolver {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Retorna os pares (label, score) com `score > threshold`, em ordem
    /// decrescente de score.
    ///
    /// Empates preservam a ordem original dos labels (`sort_by` é estável).
    /// Scores `NaN` nunca passam pelo filtro. Scores além do tamanho do
    /// label set são ignorados.
    pub fn resolve(&self, scores: &[f32], labels: &LabelSet) -> Vec<Prediction> {
        let mut predictions: Vec<Prediction> = scores
            .iter()
            .enumerate()
            .filter(|&(_, &score)| score > self.threshold)
            .filter_map(|(i, &score)| {
                labels.get(i).map(|tag| Prediction {
                    tag: tag.to_string(),
                    confidence: score,
                })
            })
            .collect();
        predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        predictions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(tags: &[&str]) -> LabelSet {
        LabelSet::new(tags.iter().map(|t| t.to_string()).collect())
    }

    // ─── IntentResolver ────────────────────────────────────────

    #[test]
    fn keeps_only_scores_above_threshold() {
        let labels = labels(&["goodbye", "greeting", "thanks"]);
        let out = IntentResolver::default().resolve(&[0.02, 0.95, 0.03], &labels);
        assert_eq!(
            out,
            vec![Prediction { tag: "greeting".into(), confidence: 0.95 }]
        );
    }

    #[test]
    fn threshold_is_strict() {
        let labels = labels(&["a", "b"]);
        let out = IntentResolver::new(0.5).resolve(&[0.5, 0.25], &labels);
        assert!(out.is_empty());
    }

    #[test]
    fn sorted_descending_and_all_above_threshold() {
        let labels = labels(&["a", "b", "c", "d", "e"]);
        let resolver = IntentResolver::new(0.1);
        let out = resolver.resolve(&[0.2, 0.9, 0.05, 0.5, 0.3], &labels);
        let tags: Vec<_> = out.iter().map(|p| p.tag.as_str()).collect();
        assert_eq!(tags, vec!["b", "d", "e", "a"]);
        assert!(out.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert!(out.iter().all(|p| p.confidence > resolver.threshold()));
    }

    #[test]
    fn ties_keep_label_order() {
        let labels = labels(&["first", "second", "third"]);
        let out = IntentResolver::new(0.1).resolve(&[0.4, 0.2, 0.4], &labels);
        let tags: Vec<_> = out.iter().map(|p| p.tag.as_str()).collect();
        assert_eq!(tags, vec!["first", "third", "second"]);
    }

    #[test]
    fn no_confident_intent_is_empty_not_error() {
        let labels = labels(&["a", "b"]);
        assert!(IntentResolver::default().resolve(&[0.3, 0.3], &labels).is_empty());
        assert!(IntentResolver::default().resolve(&[], &labels).is_empty());
    }

    #[test]
    fn nan_never_passes() {
        let labels = labels(&["a", "b"]);
        let out = IntentResolver::default().resolve(&[f32::NAN, 0.8], &labels);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, "b");
    }

    // ─── IntentTable ───────────────────────────────────────────

    #[test]
    fn first_duplicate_tag_wins() {
        let file: IntentsFile = serde_json::from_str(
            r#"{"intents": [
                {"tag": "greeting", "patterns": ["hi"], "responses": ["Hello!"]},
                {"tag": "greeting", "responses": ["Ignored"]},
                {"tag": "goodbye", "responses": ["Bye"]}
            ]}"#,
        )
        .unwrap();
        let table = IntentTable::from_entries(file.intents);
        assert_eq!(table.len(), 2);
        assert_eq!(table.responses("greeting").unwrap(), ["Hello!".to_string()]);
        assert!(table.contains("goodbye"));
        assert!(table.responses("weather").is_none());
        assert!(!table.is_empty());
    }

    #[test]
    fn empty_collections() {
        assert!(IntentTable::default().is_empty());
        assert!(IntentTable::from_entries(Vec::new()).is_empty());
        assert!(LabelSet::new(Vec::new()).is_empty());
        assert!(!labels(&["a"]).is_empty());
    }

    #[test]
    fn prediction_serializes_like_predict_class() {
        let p = Prediction { tag: "greeting".into(), confidence: 0.5 };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json, serde_json::json!({"intent": "greeting", "probability": 0.5}));
    }
}

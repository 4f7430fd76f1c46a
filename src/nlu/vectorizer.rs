//! # Vetorizador Bag-of-Words
//!
//! Converte a sequência de tokens em um vetor de presença de tamanho fixo
//! sobre o [`Vocabulary`] treinado:
//!
//! ```text
//! vocabulário: ["bye", "hello", "how", "you"]
//! tokens:      ["hello", "how", "are", "you"]
//!                  ↓
//! vetor:       [0.0, 1.0, 1.0, 1.0]     ("are" é desconhecido → ignorado)
//! ```
//!
//! A ordem e a repetição dos tokens não importam; só presença/ausência.

use std::collections::HashMap;

use super::ArtifactError;

/// Vocabulário ordenado e sem duplicatas, fixo durante toda a vida do processo.
///
/// A posição de cada palavra define o índice correspondente no vetor de
/// features; por isso a ordem precisa ser exatamente a usada no treino.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Constrói o vocabulário, rejeitando tokens repetidos.
    pub fn new(words: Vec<String>) -> Result<Self, ArtifactError> {
        let mut index = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if index.insert(word.clone(), i).is_some() {
                return Err(ArtifactError::DuplicateToken(word.clone()));
            }
        }
        Ok(Self { words, index })
    }

    /// Número de palavras — também a dimensão do vetor de features.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Índice da palavra, se conhecida.
    pub fn position(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Codificador bag-of-words sobre um [`Vocabulary`].
pub struct Vectorizer {
    vocabulary: Vocabulary,
}

impl Vectorizer {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Dimensão de saída (sempre `|vocabulário|`).
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    /// Gera o vetor de presença `{0, 1}` para uma sequência de tokens.
    ///
    /// Tokens fora do vocabulário são ignorados silenciosamente; o tamanho
    /// do vetor independe do tamanho da entrada.
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<f32> {
        let mut features = vec![0.0f32; self.vocabulary.len()];
        for token in tokens {
            if let Some(i) = self.vocabulary.position(token.as_ref()) {
                features[i] = 1.0;
            }
        }
        features
    }
}

//! # Normalizador — Texto Bruto → Tokens Lematizados
//!
//! O [`Normalizer`] transforma a mensagem do usuário na sequência de tokens
//! que o [`Vectorizer`](super::vectorizer::Vectorizer) consegue casar com o
//! vocabulário treinado.
//!
//! ## Pipeline
//!
//! ```text
//! "The DOGS don't bark!"
//!   ├── 1. NFC normalize + apóstrofo tipográfico (’ → ')
//!   ├── 2. Segmentação por fronteira de palavra (UAX #29)
//!   │      → ["The", "DOGS", "don't", "bark", "!"]
//!   ├── 3. Lowercase + separação de clíticos
//!   │      → ["the", "dogs", "do", "n't", "bark", "!"]
//!   └── 4. Lematização (substantivos, estilo WordNet morphy)
//!          → ["the", "dog", "do", "n't", "bark", "!"]
//! ```
//!
//! Pontuação vira token próprio, como no tokenizador usado no treino. O
//! vocabulário normalmente não contém pontuação, então esses tokens são
//! ignorados mais adiante sem custo.
//!
//! ## Lematização Guiada pelo Léxico
//!
//! Sem o dicionário WordNet completo, as regras de destacamento de sufixo
//! só aceitam um candidato se ele existir no **léxico** (o vocabulário do
//! modelo). Uma palavra que já está no léxico é sua própria forma base e não
//! passa pelas regras (`thanks` fica `thanks` se o vocabulário a contém).
//! Caso contrário, entre os candidatos aceitos vence o mais curto; sem
//! candidato, a palavra segue inalterada.
//!
//! | Regra | Exemplo |
//! |-------|---------|
//! | `s → ∅` | `hours → hour` |
//! | `ses → s` | `buses → bus` |
//! | `xes → x` | `boxes → box` |
//! | `zes → z` | `quizzes → quizz` |
//! | `ches → ch` | `churches → church` |
//! | `shes → sh` | `wishes → wish` |
//! | `men → man` | `firemen → fireman` |
//! | `ies → y` | `stories → story` |

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Clíticos do inglês destacados do fim de uma palavra (`don't` → `do` + `n't`).
const CLITICS: &[&str] = &["n't", "'s", "'re", "'ve", "'ll", "'m", "'d"];

/// Regras de destacamento de sufixo para substantivos (sufixo, substituição).
const DETACHMENT_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Plurais irregulares que nenhuma regra de sufixo resolve.
const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("data", "datum"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("lice", "louse"),
    ("men", "man"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("teeth", "tooth"),
    ("women", "woman"),
];

/// Tokenizador + lematizador, imutável após construção.
///
/// Mantém o próprio léxico (cópia das palavras do vocabulário) para que a
/// lematização não dependa do tempo de vida do [`Vocabulary`](super::vectorizer::Vocabulary).
pub struct Normalizer {
    /// Formas canônicas conhecidas; gate de aceitação dos candidatos a lema.
    lexicon: HashSet<String>,
}

impl Normalizer {
    /// Cria um normalizador cujo léxico são as palavras informadas.
    pub fn new<I, S>(lexicon: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lexicon: lexicon.into_iter().map(Into::into).collect(),
        }
    }

    /// Converte texto bruto em tokens lowercase lematizados.
    ///
    /// Nunca falha: texto vazio (ou só espaços) retorna `Vec::new()`.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let text: String = text.nfc().map(|c| if c == '’' { '\'' } else { c }).collect();

        let mut tokens = Vec::new();
        for segment in text.split_word_bounds() {
            if segment.trim().is_empty() {
                continue;
            }
            let lower = segment.to_lowercase();
            let (stem, clitic) = split_clitic(&lower);
            tokens.push(self.lemmatize(stem));
            if let Some(clitic) = clitic {
                tokens.push(clitic.to_string());
            }
        }
        tokens
    }

    /// Reduz uma palavra lowercase ao seu lema de substantivo.
    ///
    /// Palavras do léxico voltam inalteradas.
    pub fn lemmatize(&self, word: &str) -> String {
        if !word.chars().next().is_some_and(char::is_alphabetic) {
            return word.to_string();
        }

        if self.lexicon.contains(word) {
            return word.to_string();
        }

        let mut candidates: Vec<String> = Vec::new();
        if let Some((_, lemma)) = NOUN_EXCEPTIONS.iter().find(|(plural, _)| *plural == word) {
            if self.lexicon.contains(*lemma) {
                candidates.push((*lemma).to_string());
            }
        }
        for (suffix, replacement) in DETACHMENT_RULES {
            if let Some(base) = word.strip_suffix(suffix) {
                if base.is_empty() {
                    continue;
                }
                let candidate = format!("{base}{replacement}");
                if self.lexicon.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }

        // min_by_key devolve o primeiro entre empatados
        candidates
            .into_iter()
            .min_by_key(|c| c.chars().count())
            .unwrap_or_else(|| word.to_string())
    }
}

/// Separa um clítico final (`it's` → `it` + `'s`), se houver.
fn split_clitic(word: &str) -> (&str, Option<&str>) {
    for clitic in CLITICS {
        if word.len() > clitic.len() && word.ends_with(clitic) {
            let at = word.len() - clitic.len();
            return (&word[..at], Some(&word[at..]));
        }
    }
    (word, None)
}

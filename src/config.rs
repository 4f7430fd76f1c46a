//! # Configuração — Linha de Comando e Variáveis de Ambiente
//!
//! Todas as opções têm um default sensato e podem vir de flag ou de
//! variável de ambiente (`--bind` ou `CHAT_BIND`, por exemplo).
//!
//! ```bash
//! # Artefatos no diretório atual, porta 5000
//! cargo run
//!
//! # Artefatos em outro diretório, threshold mais exigente, logs detalhados
//! cargo run -- --data-dir models/ --threshold 0.85 --debug
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::artifacts::ArtifactPaths;
use crate::nlu::intent::DEFAULT_THRESHOLD;

/// Servidor de chat por classificação de intents.
#[derive(Parser, Debug, Clone)]
#[command(name = "intent-chat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Intent-classification chat responder over HTTP")]
pub struct Config {
    /// Endereço de escuta do servidor HTTP
    #[arg(long, env = "CHAT_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Diretório com os artefatos do modelo
    #[arg(long, env = "CHAT_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Vocabulário (JSON array), relativo a --data-dir
    #[arg(long, default_value = "words.json")]
    pub words: PathBuf,

    /// Label set (JSON array), relativo a --data-dir
    #[arg(long, default_value = "classes.json")]
    pub classes: PathBuf,

    /// Tabela de intents e respostas, relativa a --data-dir
    #[arg(long, default_value = "intents.json")]
    pub intents: PathBuf,

    /// Pesos do classificador (safetensors), relativos a --data-dir
    #[arg(long, default_value = "model.safetensors")]
    pub model: PathBuf,

    /// Confiança mínima (estrita) para aceitar um intent
    #[arg(long, env = "CHAT_THRESHOLD", default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: f32,

    /// Log em nível debug quando RUST_LOG não estiver definido
    #[arg(long, env = "CHAT_DEBUG")]
    pub debug: bool,
}

impl Config {
    /// Caminhos absolutos (ou relativos ao cwd) de cada artefato.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            words: self.data_dir.join(&self.words),
            classes: self.data_dir.join(&self.classes),
            intents: self.data_dir.join(&self.intents),
            model: self.data_dir.join(&self.model),
        }
    }

    /// Filtro de log padrão, usado quando `RUST_LOG` não está presente.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Aceita thresholds em `[0, 1)`; 1.0 ou mais nunca deixaria passar um softmax.
fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("invalid threshold {s:?}: {e}"))?;
    if (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be in [0, 1), got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    /// Flags explícitas para tudo que também pode vir do ambiente, assim
    /// `CHAT_BIND`/`CHAT_DATA_DIR`/`CHAT_THRESHOLD` da máquina não interferem.
    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let mut argv = vec!["intent-chat"];
        for (flag, value) in [("--bind", "127.0.0.1:5000"), ("--data-dir", "."), ("--threshold", "0.7")] {
            if !args.contains(&flag) {
                argv.extend([flag, value]);
            }
        }
        argv.extend_from_slice(args);
        Config::try_parse_from(argv)
    }

    fn default_of(id: &str) -> String {
        let command = Config::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == id)
            .unwrap_or_else(|| panic!("no argument {id}"));
        arg.get_default_values()[0].to_string_lossy().into_owned()
    }

    #[test]
    fn defaults_match_the_artifact_layout() {
        assert_eq!(default_of("bind"), "127.0.0.1:5000");
        assert_eq!(default_of("data_dir"), ".");
        assert_eq!(default_of("words"), "words.json");
        assert_eq!(default_of("classes"), "classes.json");
        assert_eq!(default_of("intents"), "intents.json");
        assert_eq!(default_of("model"), "model.safetensors");
        assert_eq!(default_of("threshold").parse::<f32>().unwrap(), DEFAULT_THRESHOLD);

        let paths = parse(&[]).unwrap().artifact_paths();
        assert_eq!(paths.words, PathBuf::from("./words.json"));
        assert_eq!(paths.model, PathBuf::from("./model.safetensors"));
    }

    #[test]
    fn file_names_are_joined_to_data_dir() {
        let config = parse(&["--data-dir", "/srv/bot", "--intents", "faq.json", "--debug"]).unwrap();
        assert_eq!(config.artifact_paths().intents, PathBuf::from("/srv/bot/faq.json"));
        assert_eq!(config.default_log_filter(), "debug");
    }

    #[test]
    fn threshold_is_validated() {
        assert_eq!(parse(&["--threshold", "0.85"]).unwrap().threshold, 0.85);
        assert!(parse(&["--threshold", "1.5"]).is_err());
        assert!(parse(&["--threshold", "-0.1"]).is_err());
        assert!(parse(&["--threshold", "high"]).is_err());
    }
}

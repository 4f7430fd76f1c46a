//! # Classificador — Vetor de Features → Scores por Intent
//!
//! O modelo treinado é tratado como caixa-preta atrás da trait
//! [`Classifier`]: recebe o vetor bag-of-words e devolve um score por
//! label, na mesma ordem do label set. O restante do pipeline não conhece
//! nenhum runtime numérico específico.
//!
//! ## Runtime Padrão: [`MlpClassifier`]
//!
//! Uma pilha de camadas densas avaliada com **candle** na CPU, o mesmo
//! formato da rede usada no treino:
//!
//! ```text
//! features [1, |vocab|]
//!   → dense_0 → ReLU
//!   → dense_1 → ReLU
//!   → ...
//!   → dense_n → softmax
//!   → scores [|labels|]
//! ```
//!
//! Dropout não aparece: em inferência é identidade.
//!
//! ## Formato dos Pesos (safetensors)
//!
//! | Tensor | Shape |
//! |--------|-------|
//! | `dense_{i}.weight` | `[out, in]` |
//! | `dense_{i}.bias` | `[out]` |
//!
//! Os índices `i` começam em 0 e são contíguos; a primeira lacuna encerra a pilha.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{Linear, Module};

use super::ArtifactError;

/// Interface estreita do modelo: vetor de entrada, sequência de scores na saída.
///
/// Implementações precisam ser `Send + Sync` — uma única instância é
/// compartilhada, somente leitura, entre todas as requisições.
pub trait Classifier: Send + Sync {
    /// Dimensão esperada do vetor de features.
    fn input_dim(&self) -> usize;

    /// Número de scores produzidos (um por label).
    fn output_dim(&self) -> usize;

    /// Executa uma forward pass. Função pura, sem efeitos colaterais observáveis.
    fn predict(&self, features: &[f32]) -> Result<Vec<f32>>;
}

/// Perceptron multicamadas carregado de um arquivo safetensors.
pub struct MlpClassifier {
    /// Camadas densas na ordem de avaliação.
    layers: Vec<Linear>,
    input_dim: usize,
    output_dim: usize,
    /// Device de execução (sempre CPU; o modelo é pequeno).
    device: Device,
}

impl MlpClassifier {
    /// Carrega os pesos de `path` para a CPU.
    ///
    /// # Erros
    ///
    /// Retorna erro se o arquivo não existir, não for safetensors válido,
    /// ou se as camadas não formarem uma cadeia consistente.
    pub fn load(path: &Path) -> Result<Self> {
        let device = Device::Cpu;
        let tensors = candle_core::safetensors::load(path, &device)
            .with_context(|| format!("Failed to load classifier weights from {}", path.display()))?;
        Self::from_tensors(tensors, &device)
    }

    /// Monta o modelo a partir de tensores já em memória.
    ///
    /// Valida, para cada camada, que o bias tem o tamanho da saída e que a
    /// entrada casa com a saída da camada anterior.
    pub fn from_tensors(mut tensors: HashMap<String, Tensor>, device: &Device) -> Result<Self> {
        let mut layers = Vec::new();
        let mut input_dim = 0;
        let mut prev_out: Option<usize> = None;

        for i in 0.. {
            let Some(weight) = tensors.remove(&format!("dense_{i}.weight")) else {
                break;
            };
            let bias_name = format!("dense_{i}.bias");
            let bias = tensors
                .remove(&bias_name)
                .ok_or(ArtifactError::MissingTensor(bias_name))?;

            let weight = weight.to_dtype(DType::F32)?.to_device(device)?;
            let bias = bias.to_dtype(DType::F32)?.to_device(device)?;
            let (out, inp) = weight.dims2().context(format!("dense_{i}.weight must be 2-D"))?;
            let bias_len = bias.dims1().context(format!("dense_{i}.bias must be 1-D"))?;

            if bias_len != out {
                return Err(ArtifactError::BiasShape {
                    layer: i,
                    expected: out,
                    actual: bias_len,
                }
                .into());
            }
            match prev_out {
                Some(prev) if prev != inp => {
                    return Err(ArtifactError::LayerChain {
                        layer: i,
                        expected: prev,
                        actual: inp,
                    }
                    .into());
                }
                Some(_) => {}
                None => input_dim = inp,
            }
            prev_out = Some(out);
            layers.push(Linear::new(weight, Some(bias)));
        }

        let output_dim = prev_out.ok_or(ArtifactError::EmptyModel)?;
        if !tensors.is_empty() {
            let mut extra: Vec<_> = tensors.keys().cloned().collect();
            extra.sort();
            tracing::warn!(tensors = ?extra, "Ignoring tensors outside the dense layer chain");
        }
        tracing::debug!(layers = layers.len(), input_dim, output_dim, "MLP classifier assembled");

        Ok(Self {
            layers,
            input_dim,
            output_dim,
            device: device.clone(),
        })
    }

    /// Forward pass em batch: `[batch, in]` → `[batch, out]` (softmax por linha).
    fn forward(&self, input: &Tensor) -> candle_core::Result<Tensor> {
        let last = self.layers.len() - 1;
        let mut x = input.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(&x)?;
            if i < last {
                x = x.relu()?;
            }
        }
        candle_nn::ops::softmax(&x, D::Minus1)
    }
}

impl Classifier for MlpClassifier {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn predict(&self, features: &[f32]) -> Result<Vec<f32>> {
        anyhow::ensure!(
            features.len() == self.input_dim,
            "feature vector has {} entries, classifier expects {}",
            features.len(),
            self.input_dim
        );
        let input = Tensor::from_slice(features, (1, self.input_dim), &self.device)?;
        let scores: Vec<f32> = self.forward(&input)?.squeeze(0)?.to_vec1()?;
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor<const R: usize, const C: usize>(rows: [[f32; C]; R]) -> Tensor {
        Tensor::new(&rows, &Device::Cpu).unwrap()
    }

    fn vector<const N: usize>(values: [f32; N]) -> Tensor {
        Tensor::new(&values, &Device::Cpu).unwrap()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    /// Uma camada: softmax([2, 0]) = [0.8808, 0.1192]
    #[test]
    fn single_layer_is_softmax_of_affine_map() {
        let tensors = HashMap::from([
            ("dense_0.weight".to_string(), tensor([[2.0, 0.0, 0.0], [0.0, 0.0, 0.0]])),
            ("dense_0.bias".to_string(), vector([0.0, 0.0])),
        ]);
        let model = MlpClassifier::from_tensors(tensors, &Device::Cpu).unwrap();
        assert_eq!(model.input_dim(), 3);
        assert_eq!(model.output_dim(), 2);

        let scores = model.predict(&[1.0, 0.0, 0.0]).unwrap();
        assert!(close(scores[0], 0.8808), "{scores:?}");
        assert!(close(scores[1], 0.1192), "{scores:?}");
    }

    /// Verifica que a ReLU entre camadas zera a ativação negativa:
    /// sem ReLU a saída seria [0.5, 0.5]
    #[test]
    fn hidden_layers_apply_relu() {
        let tensors = HashMap::from([
            ("dense_0.weight".to_string(), tensor([[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]])),
            ("dense_0.bias".to_string(), vector([0.0, 0.0])),
            ("dense_1.weight".to_string(), tensor([[3.0, 0.0], [0.0, -3.0]])),
            ("dense_1.bias".to_string(), vector([0.0, 0.0])),
        ]);
        let model = MlpClassifier::from_tensors(tensors, &Device::Cpu).unwrap();
        let scores = model.predict(&[1.0, 0.0, 0.0]).unwrap();
        assert!(close(scores[0], 0.9526), "{scores:?}");
        assert!(close(scores[1], 0.0474), "{scores:?}");
    }

    #[test]
    fn zero_input_gives_uniform_scores_without_bias() {
        let tensors = HashMap::from([
            ("dense_0.weight".to_string(), tensor([[5.0, 1.0], [1.0, 5.0], [2.0, 2.0], [0.0, 9.0]])),
            ("dense_0.bias".to_string(), vector([0.0, 0.0, 0.0, 0.0])),
        ]);
        let model = MlpClassifier::from_tensors(tensors, &Device::Cpu).unwrap();
        let scores = model.predict(&[0.0, 0.0]).unwrap();
        assert!(scores.iter().all(|&s| close(s, 0.25)), "{scores:?}");
    }

    #[test]
    fn rejects_wrong_feature_length() {
        let tensors = HashMap::from([
            ("dense_0.weight".to_string(), tensor([[1.0, 1.0]])),
            ("dense_0.bias".to_string(), vector([0.0])),
        ]);
        let model = MlpClassifier::from_tensors(tensors, &Device::Cpu).unwrap();
        assert!(model.predict(&[1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn rejects_broken_layer_chain() {
        let tensors = HashMap::from([
            ("dense_0.weight".to_string(), tensor([[1.0, 0.0], [0.0, 1.0]])),
            ("dense_0.bias".to_string(), vector([0.0, 0.0])),
            ("dense_1.weight".to_string(), tensor([[1.0, 0.0, 0.0]])),
            ("dense_1.bias".to_string(), vector([0.0])),
        ]);
        let err = MlpClassifier::from_tensors(tensors, &Device::Cpu).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ArtifactError>(),
            Some(ArtifactError::LayerChain { layer: 1, expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn rejects_missing_bias_and_empty_model() {
        let tensors = HashMap::from([("dense_0.weight".to_string(), tensor([[1.0]]))]);
        let err = MlpClassifier::from_tensors(tensors, &Device::Cpu).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ArtifactError>(),
            Some(ArtifactError::MissingTensor(name)) if name == "dense_0.bias"
        ));

        let err = MlpClassifier::from_tensors(HashMap::new(), &Device::Cpu).err().unwrap();
        assert!(matches!(err.downcast_ref::<ArtifactError>(), Some(ArtifactError::EmptyModel)));
    }

    #[test]
    fn loads_from_safetensors_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.safetensors");
        let tensors = HashMap::from([
            ("dense_0.weight".to_string(), tensor([[2.0, 0.0, 0.0], [0.0, 0.0, 0.0]])),
            ("dense_0.bias".to_string(), vector([0.0, 0.0])),
        ]);
        candle_core::safetensors::save(&tensors, &path).unwrap();

        let model = MlpClassifier::load(&path).unwrap();
        let scores = model.predict(&[1.0, 0.0, 0.0]).unwrap();
        assert!(close(scores[0], 0.8808), "{scores:?}");
    }
}

use candle::{DType, Device, IndexOp, Module, Result, Tensor};
use candle_core as candle;
use candle_nn::{Linear, VarBuilder};
use candle_transformers::models::xlm_roberta::{Config, XLMRobertaModel};
use std::path::Path;

/// XLM-RoBERTa encoder plus the BGE-M3 ColBERT projection head.
pub(crate) struct BgeM3Model {
    roberta: XLMRobertaModel,
    colbert_linear: Linear,
    config: Config,
}

/// Raw forward-pass outputs for one batch.
pub(crate) struct BgeM3Output {
    /// CLS hidden states, `[batch, hidden]`.
    pub dense: Tensor,
    /// Projected token states without CLS, padding zeroed, `[batch, seq - 1, colbert_dim]`.
    pub colbert: Tensor,
}

impl BgeM3Model {
    pub fn load(model_dir: &Path, colbert_head: &Path, device: &Device) -> Result<Self> {
        let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let weights_path = model_dir.join("model.safetensors");
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let roberta = if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            XLMRobertaModel::new(&config, vb.pp("roberta"))?
        } else {
            XLMRobertaModel::new(&config, vb.clone())?
        };

        let head_vb = if colbert_head.extension().is_some_and(|ext| ext == "pt") {
            VarBuilder::from_pth(colbert_head, DType::F32, device)?
        } else {
            unsafe { VarBuilder::from_mmaped_safetensors(&[colbert_head], DType::F32, device)? }
        };
        let colbert_linear =
            candle_nn::linear(config.hidden_size, config.hidden_size, head_vb)?;

        Ok(Self {
            roberta,
            colbert_linear,
            config,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.config.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.config.num_hidden_layers
    }

    pub fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<BgeM3Output> {
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.roberta.forward(
            input_ids,
            attention_mask,
            &token_type_ids,
            None,
            None,
            None,
        )?;

        let dense = hidden.i((.., 0, ..))?;

        let seq_len = hidden.dim(1)?;
        if seq_len < 2 {
            candle::bail!("sequence too short for ColBERT vectors: {seq_len}");
        }
        let token_states = hidden.narrow(1, 1, seq_len - 1)?;
        let colbert = self.colbert_linear.forward(&token_states)?;

        let mask = attention_mask
            .narrow(1, 1, seq_len - 1)?
            .to_dtype(colbert.dtype())?
            .unsqueeze(2)?;
        let colbert = colbert.broadcast_mul(&mask)?;

        Ok(BgeM3Output { dense, colbert })
    }
}

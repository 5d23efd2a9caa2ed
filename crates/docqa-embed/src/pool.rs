use anyhow::{ensure, Result};
use candle_core::{DType, Tensor};

/// Mean of the unmasked token states, L2-normalized per row.
///
/// `hidden` is `[B, T, H]`, `attention_mask` is `[B, T]` with 1 for real
/// tokens; the result is `[B, H]`.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let dims = hidden.dims();
    ensure!(dims.len() == 3, "hidden shape must be [B,T,H], got {:?}", dims);
    let batch = dims[0];
    let hidden_dim = dims[2];

    let mask = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?;
    let mask_3d = mask.unsqueeze(2)?;
    let mask_broadcast = mask_3d.broadcast_as(hidden.shape())?;
    let masked = (hidden * &mask_broadcast)?;
    let sum = masked.sum(1)?;
    // an all-padding row would divide by zero
    let lengths = mask.sum_keepdim(1)?.maximum(1f64)?.to_dtype(sum.dtype())?;
    let mean = sum.broadcast_div(&lengths)?;
    let eps_val = match hidden.dtype() { DType::F16 | DType::BF16 => 1e-6f64, _ => 1e-12f64 };
    let norm = (mean.sqr()?.sum_keepdim(1)?.sqrt()? + eps_val)?;
    let pooled = mean.broadcast_div(&norm)?;
    ensure!(pooled.dims() == [batch, hidden_dim], "pooled shape {:?}", pooled.dims());
    Ok(pooled)
}

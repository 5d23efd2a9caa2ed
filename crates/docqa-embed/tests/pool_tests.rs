use candle_core::{DType, Device, Tensor};
use docqa_embed::masked_mean_l2;

#[test]
fn masked_mean_l2_basic() {
    let dev = Device::Cpu;
    // Two tokens with hidden dim 4; second token is masked out.
    let h = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0,  // token 0
                                 5.0, 6.0, 7.0, 8.0],    // token 1
                               (1, 2, 4), &dev).unwrap();
    let mask = Tensor::from_slice(&[1u32, 0u32], (1, 2), &dev).unwrap()
        .to_dtype(DType::F32).unwrap();
    let out = masked_mean_l2(&h, &mask).unwrap();
    let v: Vec<Vec<f32>> = out.to_vec2().unwrap();
    let v = &v[0];
    // Mean over unmasked tokens = first token [1,2,3,4], then L2 normalize
    let norm: f32 = (1.0f32 * 1.0 + 2.0 * 2.0 + 3.0 * 3.0 + 4.0 * 4.0).sqrt();
    let expected = [1.0 / norm, 2.0 / norm, 3.0 / norm, 4.0 / norm];
    for (a, b) in v.iter().cloned().zip(expected) {
        assert!((a - b).abs() < 1e-5, "a={} b={}", a, b);
    }
}

#[test]
fn masked_mean_l2_rows_are_independent() {
    let dev = Device::Cpu;
    let h = Tensor::from_slice(&[3.0f32, 0.0, 1.0, 1.0,
                                 0.0, 2.0, 0.0, 4.0],
                               (2, 2, 2), &dev).unwrap();
    let mask = Tensor::from_slice(&[1f32, 1.0, 1.0, 0.0], (2, 2), &dev).unwrap();
    let v: Vec<Vec<f32>> = masked_mean_l2(&h, &mask).unwrap().to_vec2().unwrap();
    assert_eq!(v.len(), 2);
    // row 0: mean([3,0],[1,1]) = [2,0.5]; row 1: only [0,2]
    let n0 = (2.0f32 * 2.0 + 0.5 * 0.5).sqrt();
    assert!((v[0][0] - 2.0 / n0).abs() < 1e-5);
    assert!((v[0][1] - 0.5 / n0).abs() < 1e-5);
    assert!(v[1][0].abs() < 1e-5);
    assert!((v[1][1] - 1.0).abs() < 1e-5);
}

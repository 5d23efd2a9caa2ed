use docqa_core::config::EmbeddingSettings;
use docqa_core::traits::Embedder;
use docqa_embed::{get_default_embedder, FakeEmbedder};

fn dot(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

#[test]
fn fake_embedder_shapes_and_determinism() {
    let settings = EmbeddingSettings { use_fake: true, fake_dim: 384, ..EmbeddingSettings::default() };
    let embedder = get_default_embedder(&settings).expect("embedder");
    let texts = vec!["merhaba dünya".to_string(), "merhaba dünya".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    assert_eq!(embs.len(), 2);
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 384, "embedding dim follows settings");
    assert_eq!(embedder.dim(), 384);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_empty_text_is_still_a_unit_vector() {
    let embedder = FakeEmbedder::new(16);
    let v = embedder.embed_text("   ");
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-6);
}

#[test]
fn fake_embedder_prefers_shared_tokens() {
    let embedder = FakeEmbedder::new(512);
    let q = embedder.embed_text("ankara başkent");
    let near = embedder.embed_text("ankara başkent nüfus");
    let far = embedder.embed_text("deniz kıyısı tatil");
    assert!(dot(&q, &near) > dot(&q, &far));
}

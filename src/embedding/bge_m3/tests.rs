use super::*;
use std::path::PathBuf;

mod config_tests {
    use super::*;
    use crate::config::ConfigError;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_config_default_is_stub() {
        let config = BgeM3Config::default();
        assert!(config.is_stub());
        assert_eq!(config.max_seq_len, BGE_M3_MAX_SEQ_LEN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_new() {
        let config = BgeM3Config::new("/models/bge-m3");
        assert_eq!(config.model_dir, Some(PathBuf::from("/models/bge-m3")));
        assert!(!config.is_stub());
    }

    #[test]
    fn test_config_validate_missing_dir() {
        let config = BgeM3Config::new("/nonexistent/bge-m3");
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_config_validate_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();

        let config = BgeM3Config::new(dir.path());
        match config.validate() {
            Err(EmbeddingError::MissingModelFile { file, .. }) => {
                assert_eq!(file, "model.safetensors")
            }
            other => panic!("expected MissingModelFile, got {:?}", other),
        }
    }

    #[test]
    fn test_config_validate_missing_colbert_head() {
        let dir = tempfile::tempdir().unwrap();
        for file in REQUIRED_MODEL_FILES {
            std::fs::write(dir.path().join(file), "").unwrap();
        }

        let config = BgeM3Config::new(dir.path());
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::MissingModelFile {
                file: "colbert_linear.safetensors",
                ..
            })
        ));

        std::fs::write(dir.path().join("colbert_linear.pt"), "").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.colbert_head_path(),
            Some(dir.path().join("colbert_linear.pt"))
        );
    }

    #[test]
    fn test_config_validate_short_seq_len() {
        let config = BgeM3Config::stub().with_max_seq_len(1);
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        unsafe {
            env::set_var(BgeM3Config::ENV_MODEL_PATH, "  /models/bge-m3  ");
            env::set_var(BgeM3Config::ENV_MAX_SEQ_LEN, "512");
        }

        let config = BgeM3Config::from_env().expect("should parse");
        assert_eq!(config.model_dir, Some(PathBuf::from("/models/bge-m3")));
        assert_eq!(config.max_seq_len, 512);

        unsafe {
            env::remove_var(BgeM3Config::ENV_MODEL_PATH);
            env::remove_var(BgeM3Config::ENV_MAX_SEQ_LEN);
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_blank_path_is_stub() {
        unsafe { env::set_var(BgeM3Config::ENV_MODEL_PATH, "   ") };

        let config = BgeM3Config::from_env().expect("should parse");
        assert!(config.is_stub());
        assert_eq!(config.max_seq_len, BGE_M3_MAX_SEQ_LEN);

        unsafe { env::remove_var(BgeM3Config::ENV_MODEL_PATH) };
    }

    #[test]
    #[serial]
    fn test_config_from_env_rejects_unparsable_seq_len() {
        unsafe { env::set_var(BgeM3Config::ENV_MAX_SEQ_LEN, "abc") };

        let result = BgeM3Config::from_env();

        unsafe { env::remove_var(BgeM3Config::ENV_MAX_SEQ_LEN) };

        assert!(matches!(
            result,
            Err(ConfigError::IntParseError {
                name: BgeM3Config::ENV_MAX_SEQ_LEN,
                ..
            })
        ));
    }
}

mod stub_tests {
    use super::*;

    fn dot(a: &[f16], b: &[f16]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x.to_f32() * y.to_f32()).sum()
    }

    #[test]
    fn test_stub_encoder_state() {
        let encoder = BgeM3Encoder::stub().unwrap();
        assert!(encoder.is_stub());
        assert!(!encoder.has_model());
        assert_eq!(encoder.dim(), crate::constants::STUB_EMBEDDING_DIM);
    }

    #[test]
    fn test_encode_preserves_count_and_order() {
        let encoder = BgeM3Encoder::stub().unwrap();
        let texts = ["alpha beta", "gamma", "delta epsilon zeta"];

        let encoded = encoder.encode(&texts, 2).unwrap();
        assert_eq!(encoded.len(), 3);
        assert_eq!(encoded[0].colbert.num_tokens(), 2);
        assert_eq!(encoded[1].colbert.num_tokens(), 1);
        assert_eq!(encoded[2].colbert.num_tokens(), 3);
    }

    #[test]
    fn test_encode_is_deterministic_across_batch_sizes() {
        let encoder = BgeM3Encoder::stub().unwrap();
        let texts = ["The quick brown fox", "jumps over", "the lazy dog"];

        let a = encoder.encode(&texts, 1).unwrap();
        let b = encoder.encode(&texts, 3).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.dense, y.dense);
            assert_eq!(x.colbert, y.colbert);
        }
    }

    #[test]
    fn test_stub_vectors_are_normalized() {
        let encoder = BgeM3Encoder::stub().unwrap();
        let encoded = encoder.encode(&["hello world"], 1).unwrap();

        assert!((dot(&encoded[0].dense, &encoded[0].dense) - 1.0).abs() < 1e-2);
        for row in encoded[0].colbert.rows() {
            assert!((dot(row, row) - 1.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_stub_same_word_same_vector() {
        let encoder = BgeM3Encoder::stub().unwrap();
        let encoded = encoder.encode(&["Invoice total", "the INVOICE"], 1).unwrap();

        let first = encoded[0].colbert.row(0).unwrap();
        let second = encoded[1].colbert.row(1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stub_empty_text_yields_single_zero_row() {
        let encoder = BgeM3Encoder::stub().unwrap();
        let encoded = encoder.encode(&["", "  ?! "], 1).unwrap();

        for e in &encoded {
            assert_eq!(e.colbert.num_tokens(), 1);
            assert!(e.colbert.as_slice().iter().all(|v| v.to_f32() == 0.0));
            assert!(e.dense.iter().all(|v| v.to_f32() == 0.0));
        }
    }

    #[test]
    fn test_encode_rejects_zero_batch_size() {
        let encoder = BgeM3Encoder::stub().unwrap();
        assert!(matches!(
            encoder.encode(&["x"], 0),
            Err(EmbeddingError::InvalidBatchSize)
        ));
    }

    #[test]
    fn test_encode_empty_input() {
        let encoder = BgeM3Encoder::stub().unwrap();
        assert!(encoder.encode(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn test_release() {
        let mut encoder = BgeM3Encoder::stub().unwrap();
        encoder.release();

        assert!(encoder.is_released());
        assert!(matches!(
            encoder.encode(&["x"], 1),
            Err(EmbeddingError::Released)
        ));

        encoder.release();
        assert!(encoder.is_released());
    }

    #[test]
    fn test_debug_output() {
        let encoder = BgeM3Encoder::stub().unwrap();
        let debug_str = format!("{:?}", encoder);
        assert!(debug_str.contains("BgeM3Encoder"));
        assert!(debug_str.contains("Stub"));
    }
}

#[test]
fn test_load_missing_model_dir() {
    let result = BgeM3Encoder::load(BgeM3Config::new("/nonexistent/path/bge-m3"));
    assert!(matches!(result, Err(EmbeddingError::ModelNotFound { .. })));
}

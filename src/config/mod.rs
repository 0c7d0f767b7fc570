mod settings;

pub use settings::{AnalysisConfig, CompletionConfig, EmbeddingConfig, Settings};

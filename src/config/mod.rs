//! Configuration module for Spor.

mod settings;

pub use settings::{
    EmbeddingSettings, GeneralSettings, IngestionSettings, LoaderSettings, Settings,
    VectorStoreSettings,
};

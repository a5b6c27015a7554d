pub mod categorize;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod ingestion;
pub mod ports;
pub mod scoring;
pub mod synthesis;

pub use domain::{
    Category, Difficulty, IdeaDraft, IdeaRecord, MarketSize, NewsArticle, NewsRecord,
};
pub use error::PipelineError;
pub use ingestion::{IngestionReport, NewsIngestionService};
pub use ports::{
    DatabaseService, IdeaGenerationService, NewsFetchService, PortError, PortResult,
};
pub use synthesis::{IdeaOrigin, IdeaSynthesisService, SynthesisReport};

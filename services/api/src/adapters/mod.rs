pub mod db;
pub mod gemini;
pub mod memory;
pub mod news_api;

pub use db::DbAdapter;
pub use gemini::GeminiIdeasAdapter;
pub use memory::MemoryStore;
pub use news_api::NewsApiAdapter;

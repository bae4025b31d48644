//! Analyzer implementations that combine tokenizers and filters.

pub mod analyzer;
pub mod comment;
pub mod pipeline;

pub use self::analyzer::Analyzer;
pub use self::comment::CommentAnalyzer;
pub use self::pipeline::PipelineAnalyzer;

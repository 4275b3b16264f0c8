pub mod aggregate;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod quantity;
pub mod reconcile;
pub mod record;
pub mod report;

//! Index advisor for dboptima
//!
//! Maps extracted query features to index recommendations. Every
//! recommendation carries a ready-to-run `CREATE INDEX` statement and an
//! estimated improvement percentage.
//!
//! # Design Principles
//!
//! - Rules are fixed and ordered; their output shape depends only on the SQL
//! - Magnitudes are synthetic and drawn through an injectable random source
//! - A query always gets at least one recommendation

mod engine;
mod random;
mod recommendation;

pub use engine::{recommend, FALLBACK_COLUMN, FALLBACK_IMPROVEMENT, FALLBACK_REASON};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use recommendation::{generate_create_index_sql, index_name, IndexType, Recommendation};

// Ranking: TF-IDF scoring of job/course records and semantic scoring of roles.

pub mod records;
pub mod roles;
pub mod stop_words;
pub mod tfidf;

pub use records::{parse_records, rank_records, RankedRecord, Record, DEFAULT_TEXT_FIELD};
pub use roles::{builtin_roles, load_roles, RankedRole, Role, RoleCatalog};
pub use tfidf::TfIdfVectorizer;

/// Results returned by a ranking call by default.
pub const DEFAULT_TOP_N: usize = 5;

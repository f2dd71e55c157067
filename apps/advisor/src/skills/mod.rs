// Skill extraction: text cleanup, phrase segmentation and threshold matching
// against the controlled vocabulary.

pub mod matcher;
pub mod normalize;
pub mod vocabulary;

pub use matcher::{PhraseMatch, SkillMatcher, SkillSet, DEFAULT_THRESHOLD};
pub use vocabulary::Vocabulary;

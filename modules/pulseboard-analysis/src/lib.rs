pub mod lexicon;
pub mod phrases;
pub mod traits;

pub use lexicon::LexiconScorer;
pub use phrases::TitleAnalyzer;
pub use traits::{PhraseAnalyzer, SentimentScorer};

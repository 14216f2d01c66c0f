pub mod keywords;
pub mod preferences;
pub mod ranking;
pub mod recognition;
pub mod recommendations;

pub use keywords::{extract_keywords, extract_keywords_for_many, tag_recipes};
pub use preferences::PreferenceStore;
pub use ranking::{rank, rank_with_store};
pub use recognition::{HttpRecognitionProvider, RecognitionProvider};
pub use recommendations::RecommendationService;

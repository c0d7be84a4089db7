pub mod ocr;
pub mod vision;

pub use ocr::{read_menu_text, MenuText, MenuTextSource, FALLBACK_MENU_TEXT};
pub use vision::{analyze_menu_image, MenuAnalysis, MenuRecommendation, Verdict};

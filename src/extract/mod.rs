pub mod interface;
pub mod pdf;
pub mod tesseract;
pub mod extractor;

pub use extractor::Extractor;
pub use interface::{DocumentKind, OcrEngine, PdfTextReader};
pub use pdf::LopdfReader;
pub use tesseract::TesseractCli;

//! PDF text source.

mod extractor;

pub use extractor::PdfTextSource;

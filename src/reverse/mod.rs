pub mod fountain_writer;
pub mod style_classifier;

pub use fountain_writer::document_to_fountain;
pub use style_classifier::StyleClassifier;

pub mod extractor;
pub mod json;
pub mod path;
pub mod validated;

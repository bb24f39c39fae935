pub mod category;
pub mod document;
pub mod report;
pub mod settings;

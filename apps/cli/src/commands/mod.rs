pub mod history;
pub mod inspect;
pub mod settings;
pub mod summarize;

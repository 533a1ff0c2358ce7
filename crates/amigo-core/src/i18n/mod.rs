//! Localization: typed dictionaries and the fallback resolver.

mod dictionary;
mod resolver;

pub use dictionary::{Dictionary, Entry, Lookup};
pub use resolver::{DictionarySource, TranslationResolver};

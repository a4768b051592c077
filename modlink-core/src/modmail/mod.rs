// File: src/modmail/mod.rs
//
// Turning forwarded modmail messages into records: flatten, strip markup,
// parse fields, and walk channel history lazily.

pub mod echo;
pub mod extract;
pub mod normalize;
pub mod parser;
pub mod rules;
pub mod scanner;

pub use parser::FieldParser;
pub use rules::ParserRules;
pub use scanner::scan;

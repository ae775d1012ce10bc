//! Phonetic encodings of names, so that names which sound alike compare
//! equal.

mod caverphone;
mod soundex;

pub use caverphone::caverphone;
pub use soundex::soundex;

mod source;

pub use source::*;

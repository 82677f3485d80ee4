pub mod command;
pub mod leb128;
pub mod probe;

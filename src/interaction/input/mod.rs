pub mod keys;
pub mod pointer;

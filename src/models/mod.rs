pub mod label;
pub mod scan;
pub mod wine;

pub mod extraction;
pub mod scan;
pub mod storage;
pub mod vision;

pub mod collision;
pub mod pool;
pub mod random;
pub mod word;

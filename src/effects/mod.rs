pub mod blur;
pub mod filter;
pub mod grade;
pub mod ops;

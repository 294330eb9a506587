pub mod check;
pub mod page;

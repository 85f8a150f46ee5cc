pub mod controller;
pub mod sorter;

pub use controller::BekGraphController;
pub use sorter::BekPermutation;

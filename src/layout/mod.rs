pub mod head_order;

pub use head_order::HeadOrder;

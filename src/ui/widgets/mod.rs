pub mod order;

pub use order::OrderScreen;

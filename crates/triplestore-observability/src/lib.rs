mod dao;
mod triple_store;

pub use dao::*;
pub use triple_store::*;

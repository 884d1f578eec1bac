pub mod load;
pub mod sync;

pub mod needs;
pub mod pick;
pub mod pool;

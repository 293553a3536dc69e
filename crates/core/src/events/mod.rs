pub mod bus;
pub mod change;

pub use bus::*;
pub use change::*;

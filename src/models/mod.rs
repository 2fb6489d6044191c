pub mod actuator;
pub mod command;
pub mod decision;
pub mod reading;

pub use actuator::*;
pub use command::*;
pub use decision::*;
pub use reading::*;

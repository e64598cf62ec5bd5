pub mod auto;
pub mod human;

pub use auto::AutoMode;
pub use human::HumanMode;

pub mod decision;
pub mod home;
pub mod requisitions;

pub use decision::decision_page;
pub use home::home_page;
pub use requisitions::requisitions_page;

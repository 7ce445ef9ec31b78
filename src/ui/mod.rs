/// Screens of the application
///
/// Each screen is a plain `view` function over borrowed state; all
/// mutation happens in `update` in main.rs.

pub mod grid;
pub mod home;
pub mod review;

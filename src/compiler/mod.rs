pub mod cl;
pub mod driver;
pub mod logging;

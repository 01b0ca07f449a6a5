pub mod banner;
pub mod logger;
pub mod utils;

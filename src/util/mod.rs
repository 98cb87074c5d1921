pub mod paths;

pub use paths::{config_path, data_dir, database_path};

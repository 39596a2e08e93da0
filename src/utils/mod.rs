pub mod environment;
pub mod opener;
pub mod paths;
pub mod terminal;

pub use environment::{ACCESS_TOKEN_ENV, get_config_path, read_env_token};
pub use opener::{LocationOpener, SystemOpener, open_location};
pub use paths::{expand_tilde, format_path_with_tilde, validate_file_size};
pub use terminal::sanitize_cell;

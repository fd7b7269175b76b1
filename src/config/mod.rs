pub mod exclusions;
pub mod patterns;
pub mod settings;

pub use exclusions::{detect_project_type, get_default_exclusions, ProjectType};
pub use settings::{Settings, CONFIG_FILE_NAME};

mod settings;

pub use settings::{MessageConfig, PreviewConfig, EXAMPLE_CONFIG};

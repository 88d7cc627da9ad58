pub mod settings;

pub use settings::{GridSettings, Settings};

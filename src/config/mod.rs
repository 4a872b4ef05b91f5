pub mod constants;
pub mod settings;

pub use settings::{FetchStrategy, ScreenerLayout, SectorLayout, Settings};

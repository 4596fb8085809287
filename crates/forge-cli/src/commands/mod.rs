//! CLI command implementations.

mod generate;
mod preview;
mod seed;

pub use generate::GenerateCommand;
pub use preview::PreviewCommand;
pub use seed::SeedCommand;

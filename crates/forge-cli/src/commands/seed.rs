//! The seed command: generate a fresh random seed.

use std::io::Write;

use forge_keys::Seed;

use crate::cli::SeedArgs;
use crate::error::CliError;

/// Generates a random seed and prints it base64-encoded.
///
/// This is the single point where randomness enters the system; everything
/// downstream is a pure function of the seed.
pub struct SeedCommand;

impl SeedCommand {
    /// Executes the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested length is below the minimum.
    pub fn execute<W: Write>(stdout: &mut W, args: &SeedArgs) -> Result<(), CliError> {
        let seed = Seed::generate(args.length)?;
        writeln!(stdout, "{}", seed.to_base64())?;
        Ok(())
    }
}

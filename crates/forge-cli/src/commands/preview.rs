//! The preview command: print configurations without writing files.

use std::io::Write;

use forge_config::render;
use forge_topology::build;

use crate::cli::TopologyArgs;
use crate::error::CliError;
use crate::project::ProjectSettings;

/// Prints every generated configuration, labeled, to the output stream.
pub struct PreviewCommand;

impl PreviewCommand {
    /// Executes the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the topology cannot
    /// be built.
    pub fn execute<W: Write>(stdout: &mut W, args: &TopologyArgs) -> Result<(), CliError> {
        let settings = ProjectSettings::resolve(args)?;
        let request = settings.to_request()?;
        let graph = build(&request)?;

        for node in graph.nodes() {
            writeln!(stdout, "# {}", node.label())?;
            stdout.write_all(render(node).as_bytes())?;
            writeln!(stdout)?;
        }
        Ok(())
    }
}

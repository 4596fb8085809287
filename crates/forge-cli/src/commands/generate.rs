//! The generate command: write all artifacts for a topology.

use std::fs;
use std::io::Write;

use tracing::info;

use forge_config::render_deploy_script;
use forge_topology::build;

use crate::cli::GenerateArgs;
use crate::error::CliError;
use crate::project::ProjectSettings;

/// Generates configuration files into the output directory.
pub struct GenerateCommand;

impl GenerateCommand {
    /// Executes the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, the topology cannot be
    /// built, or any output file cannot be written.
    pub fn execute<W: Write>(stdout: &mut W, args: &GenerateArgs) -> Result<(), CliError> {
        let settings = ProjectSettings::resolve(&args.topology)?;
        let request = settings.to_request()?;
        let graph = build(&request)?;

        fs::create_dir_all(&args.output)?;

        let mut written = 0usize;
        for node in graph.nodes() {
            let path = args.output.join(node.file_name());
            let mut file = fs::File::create(&path)?;
            forge_config::write_to(node, &mut file)?;
            info!(path = %path.display(), peer = %node.label(), "wrote config");
            written += 1;
        }

        let script =
            render_deploy_script(&graph, &settings.command_once, &settings.command_per_peer);
        if !script.is_empty() {
            let path = args.output.join(&settings.command_file_name);
            fs::write(&path, script)?;
            info!(path = %path.display(), "wrote deploy script");
            written += 1;
        }

        writeln!(
            stdout,
            "Wrote {written} files to {}",
            args.output.display()
        )?;
        Ok(())
    }
}

//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// WGForge - deterministic WireGuard topology generation.
#[derive(Parser, Debug, Clone)]
#[command(name = "wgforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate configuration files for a topology.
    Generate(GenerateArgs),

    /// Print the generated configurations instead of writing files.
    Preview(TopologyArgs),

    /// Generate a fresh random seed and print it as base64.
    Seed(SeedArgs),
}

/// Arguments for the generate command.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Topology parameters.
    #[command(flatten)]
    pub topology: TopologyArgs,

    /// Directory the configuration files are written to.
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    pub output: PathBuf,
}

/// Topology parameters, either from a project file or from flags.
///
/// Flags override the project file; the project file overrides the
/// defaults.
#[derive(Args, Debug, Clone)]
pub struct TopologyArgs {
    /// Path to a JSON project settings file.
    #[arg(short, long, value_name = "FILE")]
    pub project: Option<PathBuf>,

    /// Seed as base64. The only secret input; everything is derived from it.
    #[arg(long, env = "WGFORGE_SEED", hide_env_values = true)]
    pub seed: Option<String>,

    /// Subnet in CIDR notation, e.g. 10.0.0.0/24.
    #[arg(long)]
    pub subnet: Option<String>,

    /// Number of client peers.
    #[arg(long)]
    pub peers: Option<usize>,

    /// UDP port the server listens on.
    #[arg(long)]
    pub listen_port: Option<u16>,

    /// host:port advertised to clients.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Comma-separated CIDR list advertised to clients.
    #[arg(long)]
    pub allowed_ips: Option<String>,

    /// DNS servers for client interfaces.
    #[arg(long)]
    pub dns: Option<String>,

    /// Put the server on the last usable address instead of the first.
    #[arg(long)]
    pub use_last_address: bool,

    /// Derive a preshared key per server-client pair.
    #[arg(long)]
    pub preshared_keys: bool,

    /// Server PostUp hook command, passed through verbatim.
    #[arg(long)]
    pub post_up: Option<String>,

    /// Server PostDown hook command, passed through verbatim.
    #[arg(long)]
    pub post_down: Option<String>,
}

/// Arguments for the seed command.
#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// Seed length in bytes.
    #[arg(short, long, default_value_t = forge_keys::DEFAULT_SEED_LEN)]
    pub length: usize,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_parses_flags() {
        let cli = Cli::try_parse_from([
            "wgforge",
            "generate",
            "--seed",
            "c2VlZA==",
            "--subnet",
            "10.0.0.0/24",
            "--peers",
            "3",
            "--output",
            "/tmp/out",
        ])
        .expect("parse failed");

        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.topology.peers, Some(3));
        assert_eq!(args.output.to_str(), Some("/tmp/out"));
    }

    #[test]
    fn seed_length_defaults() {
        let cli = Cli::try_parse_from(["wgforge", "seed"]).expect("parse failed");
        let Commands::Seed(args) = cli.command else {
            panic!("expected seed");
        };
        assert_eq!(args.length, forge_keys::DEFAULT_SEED_LEN);
    }
}

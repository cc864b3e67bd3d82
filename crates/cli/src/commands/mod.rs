use clap::Subcommand;
use pathgate_config::GatewayConfig;
use std::net::SocketAddr;
use std::process::ExitCode;

pub mod build;
pub mod cities;
pub mod find;

#[derive(Subcommand)]
pub enum Commands {
    /// Find the shortest path between two cities
    #[command(visible_alias = "f")]
    Find {
        /// Origin city
        from: String,

        /// Destination city
        to: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the cities known to the road network
    Cities {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the pathfinder executable if it is stale
    Build,

    /// Serve the gateway over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: SocketAddr,
    },
}

impl Commands {
    pub async fn execute(self, config: GatewayConfig) -> eyre::Result<ExitCode> {
        match self {
            Commands::Find { from, to, json } => find::execute(&config, &from, &to, json).await,
            Commands::Cities { json } => cities::execute(json),
            Commands::Build => build::execute(&config).await,
            Commands::Serve { addr } => {
                crate::server::serve(addr, &config).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

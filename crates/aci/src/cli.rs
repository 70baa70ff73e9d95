//! Clap derive structures for the `aci` CLI.

use aci_core::{NodeId, NodeRole, PodId};
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aci -- manage Cisco APIC fabrics from the command line
#[derive(Debug, Parser)]
#[command(
    name = "aci",
    version,
    about = "Manage Cisco APIC fabric objects from the command line",
    long_about = "Register and decommission fabric nodes, and manage geolocation,\n\
        tenants and VRFs through the APIC REST API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "ACI_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller host or URL (overrides profile)
    #[arg(long, short = 'c', env = "ACI_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// APIC user name (overrides profile)
    #[arg(long, short = 'u', env = "ACI_USERNAME", global = true)]
    pub username: Option<String>,

    /// APIC password (overrides profile)
    #[arg(long, env = "ACI_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ACI_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept the controller's self-signed certificate
    #[arg(long, short = 'k', env = "ACI_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ACI_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage fabric node membership
    #[command(alias = "node", alias = "n")]
    Nodes(NodesArgs),

    /// Manage the geolocation tree (sites, buildings, floors, rooms, rows, racks)
    #[command(alias = "geolocation")]
    Geo(GeoArgs),

    /// Manage tenants
    #[command(alias = "tn")]
    Tenants(TenantsArgs),

    /// Manage VRFs
    #[command(alias = "ctx")]
    Vrfs(VrfsArgs),

    /// Log in and show session details
    Login,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NODES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

/// Identity of one fabric node.
#[derive(Debug, Args)]
pub struct NodeSpec {
    /// Switch serial number
    pub serial: String,

    /// Node ID (101-4000)
    #[arg(long)]
    pub id: NodeId,

    /// Node name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Pod ID
    #[arg(long, default_value = "1")]
    pub pod: PodId,

    /// Expected role
    #[arg(long)]
    pub role: Option<NodeRole>,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List discovered leaf and spine switches
    #[command(alias = "ls")]
    List,

    /// Register a switch in the node identity policy
    Add(NodeSpec),

    /// Change a registered switch's name or ID
    Update(NodeSpec),

    /// Remove a switch from the node identity policy
    #[command(alias = "rm")]
    Delete(NodeSpec),

    /// Decommission a switch and remove it from the controller
    Decommission {
        /// Node ID (101-4000)
        #[arg(long)]
        id: NodeId,

        /// Pod ID
        #[arg(long, default_value = "1")]
        pod: PodId,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GEOLOCATION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GeoArgs {
    #[command(subcommand)]
    pub command: GeoCommand,
}

/// Path to one location, outermost first. The deepest level given is the
/// target; the levels above it are its ancestors.
#[derive(Debug, Args)]
pub struct LocationPath {
    /// Site name
    #[arg(long)]
    pub site: String,

    /// Building name
    #[arg(long)]
    pub building: Option<String>,

    /// Floor name
    #[arg(long, requires = "building")]
    pub floor: Option<String>,

    /// Room name
    #[arg(long, requires = "floor")]
    pub room: Option<String>,

    /// Row name
    #[arg(long, requires = "room")]
    pub row: Option<String>,

    /// Rack name
    #[arg(long, requires = "row")]
    pub rack: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum GeoCommand {
    /// List all sites with their location trees
    #[command(alias = "ls")]
    List,

    /// Show one site's location tree
    Show {
        /// Site name
        site: String,
    },

    /// Create a location
    Add {
        #[command(flatten)]
        path: LocationPath,

        /// Description
        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Change a location's description
    Update {
        #[command(flatten)]
        path: LocationPath,

        /// New description
        #[arg(long, short = 'd')]
        description: String,
    },

    /// Delete a location and everything below it
    #[command(alias = "rm")]
    Delete {
        #[command(flatten)]
        path: LocationPath,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TENANTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TenantsArgs {
    #[command(subcommand)]
    pub command: TenantsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TenantsCommand {
    /// List tenants
    #[command(alias = "ls")]
    List,

    /// Create a tenant
    Add {
        /// Tenant name
        name: String,

        /// Description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// VRFs to create inside the new tenant
        #[arg(long = "vrf", value_name = "NAME")]
        vrfs: Vec<String>,
    },

    /// Change a tenant's description
    Update {
        /// Tenant name
        name: String,

        /// New description
        #[arg(long, short = 'd')]
        description: String,
    },

    /// Delete a tenant and everything in it
    #[command(alias = "rm")]
    Delete {
        /// Tenant name
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VRFS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VrfsArgs {
    /// Owning tenant
    #[arg(long, short = 't', global = true)]
    pub tenant: Option<String>,

    #[command(subcommand)]
    pub command: VrfsCommand,
}

#[derive(Debug, Subcommand)]
pub enum VrfsCommand {
    /// List VRFs in a tenant
    #[command(alias = "ls")]
    List,

    /// Create a VRF
    Add {
        /// VRF name
        name: String,

        /// Description
        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Change a VRF's description
    Update {
        /// VRF name
        name: String,

        /// New description
        #[arg(long, short = 'd')]
        description: String,
    },

    /// Delete a VRF
    #[command(alias = "rm")]
    Delete {
        /// VRF name
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with guided setup
    Init,

    /// Display the current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (controller, username, password_env, ca_cert, insecure, timeout)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

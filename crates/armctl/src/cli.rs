//! Clap derive structures for the `armctl` CLI.
//!
//! Defines the command tree, global flags, and shared value parsers.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use armctl_core::{IpAllocationMethod, SubnetSpec};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// armctl -- networks, resource groups and providers on Azure Resource Manager
#[derive(Debug, Parser)]
#[command(
    name = "armctl",
    version,
    about = "Manage Azure Resource Manager networks and resource groups from the command line",
    long_about = "Create and inspect virtual networks, subnets, public IP addresses,\n\
        network interfaces and resource groups, and register resource providers.\n\n\
        Targets public Azure or an Azure Stack Hub endpoint; the 2018-03-01 hybrid\n\
        API profile is used unless a profile selects another.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "ARMCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Management endpoint URL (overrides profile)
    #[arg(long, short = 'e', env = "ARMCTL_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Subscription ID (overrides profile)
    #[arg(long, env = "ARMCTL_SUBSCRIPTION", global = true)]
    pub subscription: Option<String>,

    /// Bearer token (overrides profile credentials)
    #[arg(long, env = "ARMCTL_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// API profile: hybrid-2018-03-01 or latest
    #[arg(long, env = "ARMCTL_API_PROFILE", global = true)]
    pub api_profile: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ARMCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ARMCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ARMCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable detail view (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, resource ID only (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage virtual networks
    #[command(alias = "vnets")]
    Vnet(VnetArgs),

    /// Manage subnets of an existing virtual network
    Subnet(SubnetArgs),

    /// Manage public IP addresses
    #[command(alias = "pip")]
    PublicIp(PublicIpArgs),

    /// Manage network interfaces
    #[command(alias = "nics")]
    Nic(NicArgs),

    /// Manage resource groups
    #[command(alias = "rg")]
    Group(GroupArgs),

    /// Register and inspect resource providers
    Provider(ProviderArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupScope {
    /// Resource group containing the resource
    #[arg(long, short = 'g')]
    pub resource_group: String,
}

// ── Virtual networks ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VnetArgs {
    #[command(subcommand)]
    pub command: VnetCommand,
}

#[derive(Debug, Subcommand)]
pub enum VnetCommand {
    /// Create (or update) a virtual network with inline subnets
    Create {
        name: String,
        #[command(flatten)]
        scope: GroupScope,
        /// Azure region, e.g. `local` on Azure Stack Hub
        #[arg(long, short = 'l')]
        location: String,
        /// Address space prefix in CIDR form (repeatable)
        #[arg(long = "address-prefix", required = true)]
        address_prefixes: Vec<String>,
        /// Inline subnet as NAME=PREFIX (repeatable)
        #[arg(long = "subnet", value_parser = parse_subnet_spec)]
        subnets: Vec<SubnetSpec>,
        /// Tag as KEY=VALUE (repeatable)
        #[arg(long = "tag", value_parser = parse_key_value)]
        tags: Vec<(String, String)>,
    },

    /// Show a virtual network
    Get {
        name: String,
        #[command(flatten)]
        scope: GroupScope,
    },
}

// ── Subnets ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SubnetArgs {
    #[command(subcommand)]
    pub command: SubnetCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubnetCommand {
    /// Add a subnet to an existing virtual network
    Add {
        name: String,
        #[command(flatten)]
        scope: GroupScope,
        /// Parent virtual network
        #[arg(long)]
        vnet: String,
        /// Subnet prefix in CIDR form
        #[arg(long)]
        address_prefix: String,
    },

    /// Show a subnet
    Get {
        name: String,
        #[command(flatten)]
        scope: GroupScope,
        #[arg(long)]
        vnet: String,
    },
}

// ── Public IP addresses ──────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PublicIpArgs {
    #[command(subcommand)]
    pub command: PublicIpCommand,
}

#[derive(Debug, Subcommand)]
pub enum PublicIpCommand {
    /// Create (or update) a public IP address
    Create {
        name: String,
        #[command(flatten)]
        scope: GroupScope,
        #[arg(long, short = 'l')]
        location: String,
        /// Dynamic or Static (case-insensitive)
        #[arg(long, default_value = "dynamic")]
        allocation: IpAllocationMethod,
        /// Literal address to pin; only used with Static allocation
        #[arg(long)]
        ip_address: Option<String>,
        #[arg(long = "tag", value_parser = parse_key_value)]
        tags: Vec<(String, String)>,
    },

    /// Show a public IP address
    Get {
        name: String,
        #[command(flatten)]
        scope: GroupScope,
    },
}

// ── Network interfaces ───────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NicArgs {
    #[command(subcommand)]
    pub command: NicCommand,
}

#[derive(Debug, Subcommand)]
pub enum NicCommand {
    /// Create a NIC bound to an existing subnet and public IP address
    Create {
        name: String,
        #[command(flatten)]
        scope: GroupScope,
        #[arg(long, short = 'l')]
        location: String,
        /// Virtual network holding the subnet
        #[arg(long)]
        vnet: String,
        #[arg(long)]
        subnet: String,
        /// Public IP address resource name
        #[arg(long)]
        public_ip: String,
        /// Private address allocation: Dynamic or Static
        #[arg(long, default_value = "dynamic")]
        private_allocation: IpAllocationMethod,
        #[arg(long = "tag", value_parser = parse_key_value)]
        tags: Vec<(String, String)>,
    },

    /// Show a network interface
    Get {
        name: String,
        #[command(flatten)]
        scope: GroupScope,
    },
}

// ── Resource groups ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Create (or update) a resource group
    Create {
        name: String,
        #[arg(long, short = 'l')]
        location: String,
        #[arg(long = "tag", value_parser = parse_key_value)]
        tags: Vec<(String, String)>,
    },

    /// Show a resource group
    Get { name: String },

    /// Delete a resource group and everything in it
    Delete { name: String },

    /// Check whether a resource group exists
    Exists { name: String },
}

// ── Providers ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProviderArgs {
    #[command(subcommand)]
    pub command: ProviderCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProviderCommand {
    /// Register a provider and wait until it reports Registered
    Register {
        /// Provider namespace, e.g. Microsoft.Network
        namespace: String,
        /// Give up after this many seconds
        #[arg(long, default_value = "120")]
        max_wait: u64,
        /// Seconds between registration attempts
        #[arg(long, default_value = "10")]
        interval: u64,
    },

    /// Show a provider's registration state
    Show { namespace: String },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use { name: String },

    /// Store a profile secret in the system keyring
    SetSecret {
        /// Which secret to store
        #[arg(long, value_enum, default_value = "token")]
        kind: SecretArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SecretArg {
    /// Bearer token
    Token,
    /// Service principal client secret
    ClientSecret,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

/// `KEY=VALUE`; the value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

/// `NAME=PREFIX`, or a bare `NAME` whose missing prefix is reported on create.
pub fn parse_subnet_spec(raw: &str) -> Result<SubnetSpec, String> {
    match raw.split_once('=') {
        Some((name, prefix)) if !name.trim().is_empty() => Ok(SubnetSpec::new(name.trim(), prefix.trim())),
        Some(_) => Err(format!("expected NAME=PREFIX, got '{raw}'")),
        None => Ok(SubnetSpec {
            name: raw.trim().to_owned(),
            address_prefix: None,
        }),
    }
}

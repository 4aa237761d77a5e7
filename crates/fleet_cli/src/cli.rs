//! Command-line definition.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

// ── top level ──────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "fleet",
    about = "In-memory fleet registry console",
    long_about = "Manage vehicles, drivers, maintenance and routes against an in-memory fleet.\n\
                  State lives for one invocation; use `batch` to run several commands in a row."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Engine and account settings (JSON)
    #[arg(long, env = "FLEET_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Seed data (JSON); defaults to the built-in sample fleet
    #[arg(long, env = "FLEET_MANIFEST", global = true, conflicts_with = "empty")]
    pub manifest: Option<PathBuf>,

    /// Start with no vehicles, drivers or locations
    #[arg(long, global = true)]
    pub empty: bool,

    #[command(subcommand)]
    pub command: FleetCommand,
}

/// One command line inside a batch file, without the program name.
#[derive(Debug, Parser)]
#[command(name = "batch", no_binary_name = true)]
pub struct BatchLine {
    #[command(subcommand)]
    pub command: FleetCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum FleetCommand {
    /// Vehicle directory
    #[command(subcommand)]
    Vehicle(VehicleCommand),
    /// Drivers and the dispatch queue
    #[command(subcommand)]
    Driver(DriverCommand),
    /// Maintenance priority queue
    #[command(subcommand)]
    Maintenance(MaintenanceCommand),
    /// Shortest route between two locations (name or numeric id)
    Route { from: String, to: String },
    /// Print the road network
    Network,
    /// Sorted vehicle index
    #[command(subcommand)]
    Index(IndexCommand),
    /// Staff accounts
    #[command(subcommand)]
    Account(AccountCommand),
    /// Walk through every engine with the sample fleet
    Demo,
    /// Run commands from a file, one per line, against one fleet
    Batch {
        file: PathBuf,
        /// Report failed lines and continue instead of stopping
        #[arg(long)]
        keep_going: bool,
    },
}

// ── engines ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct NewVehicle {
    pub id: String,
    pub registration: String,
    pub model: String,
    pub vehicle_type: String,
    pub year: u16,
    #[arg(long, default_value_t = 0.0)]
    pub km: f64,
    #[arg(long, default_value_t = 0)]
    pub days: u32,
}

#[derive(Debug, Clone, Subcommand)]
pub enum VehicleCommand {
    /// Register a vehicle
    Add(NewVehicle),
    /// Look a vehicle up by id
    Find { id: String },
    /// Remove a vehicle
    Remove { id: String },
    /// List all vehicles
    List,
    /// Directory bucket statistics
    Stats,
    /// Add driven kilometres
    Trip { id: String, km: f64 },
    /// Mark a vehicle as serviced
    Service { id: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum DriverCommand {
    /// Register a driver and queue them for dispatch
    Add {
        id: String,
        name: String,
        license: String,
        phone: String,
        experience_years: u32,
    },
    /// Put a registered driver at the back of the queue
    Enqueue { id: String },
    /// Take the longest-waiting driver, optionally assigning a vehicle
    Dequeue {
        #[arg(long)]
        vehicle: Option<String>,
    },
    /// Show the next driver without removing them
    Peek,
    /// List waiting drivers in order
    List,
    /// End a driver's shift and queue them again
    Release { id: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum MaintenanceCommand {
    /// Queue vehicles for maintenance
    Add {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Send the most urgent vehicle to the workshop
    ScheduleNext,
    /// Show the most urgent vehicle
    Peek,
    /// List queued vehicles, most urgent first
    List {
        #[arg(long)]
        top: Option<usize>,
    },
    /// Re-read a vehicle's counters into its queued tickets
    Refresh { id: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum IndexCommand {
    /// Index a registered vehicle again
    Add { id: String },
    /// Binary search by id
    Find { id: String },
    /// Vehicles with ids in [low, high]
    Range { low: String, high: String },
    /// All indexed vehicles in id order
    List,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AccountCommand {
    /// Register a pending employee account
    Register {
        email: String,
        password: String,
        name: String,
    },
    /// Check credentials
    Login { email: String, password: String },
    /// Activate a pending account
    Approve { email: String },
    /// List accounts awaiting approval
    Pending,
}

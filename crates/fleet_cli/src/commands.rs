//! Command execution against an in-memory [`Fleet`].

use std::fs;
use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Parser;
use fleet_core::error::FleetError;
use fleet_core::records::{DriverRecord, VehicleRecord};

use crate::accounts::AccountStatus;
use crate::cli::{
    AccountCommand, BatchLine, Cli, DriverCommand, FleetCommand, IndexCommand,
    MaintenanceCommand, VehicleCommand,
};
use crate::config::AppConfig;
use crate::fleet::Fleet;
use crate::manifest::FleetManifest;
use crate::report;

/// Command lines replayed by `fleet demo` against the sample fleet.
pub const DEMO_SCRIPT: &str = "\
# Vehicle directory
vehicle list
vehicle find V003
vehicle find V999
vehicle stats
vehicle remove V002
vehicle stats
# Driver dispatch queue
driver list
driver dequeue --vehicle V001
driver dequeue --vehicle V003
driver list
driver peek
driver dequeue --vehicle V004
driver list
# Maintenance priority queue
maintenance add V101 V102 V103 V104 V105 V106
maintenance list
maintenance list --top 3
maintenance schedule-next
maintenance schedule-next
maintenance schedule-next
maintenance list
maintenance peek
# Road network
network
route Warehouse DeliveryHub
route Warehouse IndustrialArea
route CityCenter ServiceStation
route ServiceStation DeliveryHub
# Sorted vehicle index
index list
index find V205
index find V201
index find V999
index range V203 V207
index add V205
";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub executed: usize,
    pub failed: usize,
}

/// Entry point shared by the binary and tests.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let FleetCommand::Demo = cli.command {
        return run_demo(&config, out);
    }
    let mut fleet = load_fleet(&cli, &config)?;
    execute(&mut fleet, &cli.command, out)
}

fn load_fleet(cli: &Cli, config: &AppConfig) -> Result<Fleet> {
    let manifest = if cli.empty {
        FleetManifest::default()
    } else if let Some(path) = &cli.manifest {
        FleetManifest::load(path)
            .with_context(|| format!("loading manifest {}", path.display()))?
    } else {
        FleetManifest::demo()
    };
    Ok(Fleet::from_manifest(&manifest, config)?)
}

/// Replay [`DEMO_SCRIPT`] on a fresh sample fleet. Expected misses (unknown
/// ids, duplicate index entries) are printed, not fatal.
pub fn run_demo(config: &AppConfig, out: &mut dyn Write) -> Result<()> {
    let mut fleet = Fleet::from_manifest(&FleetManifest::demo(), config)?;
    let summary = run_batch(&mut fleet, DEMO_SCRIPT, true, out)?;
    writeln!(
        out,
        "\nDemo finished: {} commands, {} reported errors.",
        summary.executed, summary.failed
    )?;
    Ok(())
}

/// Run a script of command lines. Blank lines are skipped and `#` lines are
/// echoed as section headers. Without `keep_going` the first failure stops
/// the batch and is returned with its line number.
pub fn run_batch(
    fleet: &mut Fleet,
    script: &str,
    keep_going: bool,
    out: &mut dyn Write,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    for (number, line) in script.lines().enumerate().map(|(i, line)| (i + 1, line.trim())) {
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            writeln!(out, "\n== {} ==", comment.trim())?;
            continue;
        }

        writeln!(out, "$ {line}")?;
        summary.executed += 1;
        let outcome = BatchLine::try_parse_from(line.split_whitespace())
            .map_err(anyhow::Error::from)
            .and_then(|parsed| execute_nested(fleet, &parsed.command, out));
        if let Err(err) = outcome {
            summary.failed += 1;
            if !keep_going {
                return Err(err.context(format!("line {number}: {line}")));
            }
            writeln!(out, "error: {err:#}")?;
        }
    }
    Ok(summary)
}

fn execute_nested(fleet: &mut Fleet, command: &FleetCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        FleetCommand::Demo | FleetCommand::Batch { .. } => {
            bail!("demo and batch cannot run inside a batch")
        }
        _ => execute(fleet, command, out),
    }
}

/// Execute one command and print its result.
pub fn execute(fleet: &mut Fleet, command: &FleetCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        FleetCommand::Vehicle(command) => vehicle(fleet, command, out),
        FleetCommand::Driver(command) => driver(fleet, command, out),
        FleetCommand::Maintenance(command) => maintenance(fleet, command, out),
        FleetCommand::Route { from, to } => {
            let route = fleet.route(from, to)?;
            writeln!(out, "{}", report::route(&fleet.network, &route))?;
            Ok(())
        }
        FleetCommand::Network => {
            writeln!(out, "{}", report::network_listing(&fleet.network))?;
            Ok(())
        }
        FleetCommand::Index(command) => index(fleet, command, out),
        FleetCommand::Account(command) => account(fleet, command, out),
        FleetCommand::Demo => bail!("demo runs on its own sample fleet; invoke `fleet demo`"),
        FleetCommand::Batch { file, keep_going } => {
            let script = fs::read_to_string(file)
                .with_context(|| format!("reading batch file {}", file.display()))?;
            let summary = run_batch(fleet, &script, *keep_going, out)?;
            writeln!(
                out,
                "Batch finished: {} commands, {} failed.",
                summary.executed, summary.failed
            )?;
            Ok(())
        }
    }
}

fn vehicle(fleet: &mut Fleet, command: &VehicleCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        VehicleCommand::Add(new) => {
            let record = VehicleRecord::new(
                new.id.as_str(),
                new.registration.as_str(),
                new.model.as_str(),
                new.vehicle_type.as_str(),
                new.year,
            )
            .with_usage(new.km, new.days);
            fleet.add_vehicle(record)?;
            writeln!(out, "Vehicle {} registered.", new.id)?;
        }
        VehicleCommand::Find { id } => {
            writeln!(out, "{}", report::vehicle_details(fleet.vehicles.search(id)?))?;
        }
        VehicleCommand::Remove { id } => {
            fleet.remove_vehicle(id)?;
            writeln!(out, "Vehicle {id} removed.")?;
        }
        VehicleCommand::List => {
            writeln!(out, "{}", report::vehicle_table(fleet.vehicles.iter()))?;
        }
        VehicleCommand::Stats => {
            writeln!(out, "{}", report::directory_stats(&fleet.vehicles.stats()))?;
        }
        VehicleCommand::Trip { id, km } => {
            let vehicle = fleet.record_trip(id, *km)?;
            writeln!(
                out,
                "Vehicle {id} now at {:.0} km, priority {}.",
                vehicle.kilometers(),
                vehicle.maintenance_priority()
            )?;
        }
        VehicleCommand::Service { id } => {
            let vehicle = fleet.service_vehicle(id)?;
            writeln!(
                out,
                "Vehicle {id} serviced, priority {}.",
                vehicle.maintenance_priority()
            )?;
        }
    }
    Ok(())
}

fn driver(fleet: &mut Fleet, command: &DriverCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        DriverCommand::Add {
            id,
            name,
            license,
            phone,
            experience_years,
        } => {
            let record = DriverRecord::new(
                id.as_str(),
                name.as_str(),
                license.as_str(),
                phone.as_str(),
                *experience_years,
            );
            fleet.add_driver(record)?;
            writeln!(out, "Driver {id} registered, {} waiting.", fleet.queue.len())?;
        }
        DriverCommand::Enqueue { id } => {
            let queued = fleet.enqueue_driver(id)?;
            let line = report::queued_driver(queued);
            writeln!(out, "Queued {line} at position {}.", fleet.queue.len())?;
        }
        DriverCommand::Dequeue { vehicle } => match vehicle {
            Some(vehicle) => {
                let assigned = fleet.dispatch(vehicle)?;
                writeln!(
                    out,
                    "Assigned {} to vehicle {vehicle}.",
                    report::queued_driver(&assigned)
                )?;
            }
            None => {
                let next = fleet.queue.dequeue()?;
                writeln!(out, "Dequeued {}.", report::queued_driver(&next))?;
            }
        },
        DriverCommand::Peek => {
            let next = fleet.queue.peek()?;
            writeln!(out, "Next driver: {}", report::queued_driver(next))?;
        }
        DriverCommand::List => {
            writeln!(out, "{}", report::queue_listing(&fleet.queue))?;
        }
        DriverCommand::Release { id } => {
            fleet.release_driver(id)?;
            let record = fleet.drivers.search(id)?;
            writeln!(out, "Released {}", report::driver_details(record))?;
        }
    }
    Ok(())
}

fn maintenance(fleet: &mut Fleet, command: &MaintenanceCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        MaintenanceCommand::Add { ids } => {
            for (id, priority) in fleet.queue_maintenance_all(ids.as_slice())? {
                writeln!(out, "Queued {id} for maintenance, priority {priority}.")?;
            }
        }
        MaintenanceCommand::ScheduleNext => {
            let ticket = fleet.schedule_next_maintenance()?;
            writeln!(out, "Sent to workshop: {}", report::ticket(&ticket))?;
        }
        MaintenanceCommand::Peek => {
            let next = fleet.scheduler.peek_min()?;
            writeln!(out, "Next for maintenance: {}", report::ticket(next))?;
        }
        MaintenanceCommand::List { top } => {
            let n = top.unwrap_or(fleet.scheduler.len());
            writeln!(out, "{}", report::ticket_list(fleet.scheduler.top(n)))?;
            writeln!(out, "{}", report::scheduler_summary(&fleet.scheduler))?;
        }
        MaintenanceCommand::Refresh { id } => {
            let refreshed = fleet.refresh_maintenance(id)?;
            writeln!(out, "Refreshed {refreshed} ticket(s) for {id}.")?;
        }
    }
    Ok(())
}

fn index(fleet: &mut Fleet, command: &IndexCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        IndexCommand::Add { id } => {
            let position = fleet.index_vehicle(id)?;
            writeln!(out, "Indexed {id} at position {position}.")?;
        }
        IndexCommand::Find { id } => {
            writeln!(out, "{}", report::indexed_vehicle(fleet.index.search(id)?))?;
        }
        IndexCommand::Range { low, high } => {
            writeln!(out, "{}", report::index_listing(fleet.index.range(low, high)))?;
        }
        IndexCommand::List => {
            writeln!(out, "{}", report::index_listing(fleet.index.iter()))?;
        }
    }
    Ok(())
}

fn account(fleet: &mut Fleet, command: &AccountCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        AccountCommand::Register {
            email,
            password,
            name,
        } => {
            let account = fleet.accounts.register(email, password, name)?;
            writeln!(out, "Registered {}; awaiting approval.", report::account(account))?;
        }
        AccountCommand::Login { email, password } => {
            let account = fleet.accounts.login(email, password)?;
            writeln!(out, "Welcome {}", report::account(account))?;
        }
        AccountCommand::Approve { email } => {
            let account = fleet.accounts.set_status(email, AccountStatus::Active)?;
            writeln!(out, "Approved {}", report::account(account))?;
        }
        AccountCommand::Pending => {
            let pending = fleet.accounts.pending();
            if pending.is_empty() {
                writeln!(out, "No pending approvals.")?;
            }
            for account in pending {
                writeln!(out, "{}", report::account(account))?;
            }
        }
    }
    Ok(())
}

/// Process exit status for a failed run: the engine error's code when one
/// is in the chain, 1 otherwise.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<FleetError>())
        .map_or(1, FleetError::exit_code)
}

#[cfg(test)]
mod tests {
    use fleet_core::error::RecordKind;

    use super::*;

    fn demo_fleet() -> Fleet {
        Fleet::from_manifest(&FleetManifest::demo(), &AppConfig::default()).expect("demo fleet")
    }

    fn run_script(
        fleet: &mut Fleet,
        script: &str,
        keep_going: bool,
    ) -> (Result<BatchSummary>, String) {
        let mut out = Vec::new();
        let result = run_batch(fleet, script, keep_going, &mut out);
        (result, String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn batch_shares_one_fleet() {
        let mut fleet = demo_fleet();
        let (result, text) = run_script(
            &mut fleet,
            "vehicle add V900 KA-01-ZZ-0001 Tata Truck 2024 --km 11000\n\
             maintenance add V900\n\
             maintenance peek\n",
            false,
        );
        assert_eq!(result.expect("batch"), BatchSummary { executed: 3, failed: 0 });
        assert!(text.contains("Next for maintenance: V900"), "{text}");
        assert!(fleet.index.search("V900").is_ok());
    }

    #[test]
    fn batch_stops_at_first_failure() {
        let mut fleet = demo_fleet();
        let script = "vehicle find V001\nvehicle find NOPE\nnetwork\n";
        let (result, _) = run_script(&mut fleet, script, false);
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("line 2"));
        assert_eq!(exit_code(&err), 4);
        assert_eq!(
            err.chain().find_map(|c| c.downcast_ref::<FleetError>()),
            Some(&FleetError::not_found(RecordKind::Vehicle, "NOPE"))
        );
    }

    #[test]
    fn keep_going_counts_failures() {
        let mut fleet = demo_fleet();
        let (result, text) = run_script(
            &mut fleet,
            "# header\n\nmaintenance peek\nroute Warehouse Nowhere\nbogus\nindex range V203 V207\n",
            true,
        );
        assert_eq!(result.expect("batch"), BatchSummary { executed: 4, failed: 3 });
        assert!(text.contains("== header =="));
        assert!(text.contains("error: maintenance heap is empty"));
        assert!(text.contains("V207 Ashok Leyland"));
    }

    #[test]
    fn nested_batch_is_refused() {
        let mut fleet = demo_fleet();
        let (result, _) = run_script(&mut fleet, "demo\n", false);
        assert_eq!(exit_code(&result.unwrap_err()), 1);
    }

    #[test]
    fn demo_script_runs_with_expected_misses_only() {
        let mut fleet = demo_fleet();
        let (result, text) = run_script(&mut fleet, DEMO_SCRIPT, true);
        let summary = result.expect("demo");
        // V999 twice in lookups and the duplicate index insert.
        assert_eq!(summary.failed, 3, "{text}");
        assert!(text.contains("Shortest distance: 36 km"));
        assert!(text.contains("Sent to workshop: V104"));
        assert!(text.contains("Assigned D003 Priya Singh (3 yrs) to vehicle V004."));
    }

    #[test]
    fn maintenance_add_with_unknown_id_queues_nothing() {
        let mut fleet = demo_fleet();
        let (result, text) = run_script(&mut fleet, "maintenance add V101 V102 V999
", false);
        assert_eq!(exit_code(&result.unwrap_err()), 4);
        assert!(!text.contains("Queued"));
        assert!(fleet.scheduler.is_empty());
    }

    #[test]
    fn unavailable_driver_or_vehicle_exits_with_ten() {
        let mut fleet = demo_fleet();
        let (result, _) = run_script(&mut fleet, "driver dequeue --vehicle V001
", false);
        result.expect("dispatch");

        for line in ["driver enqueue D001
", "driver enqueue D002
", "driver dequeue --vehicle V001
"] {
            let (result, _) = run_script(&mut fleet, line, false);
            assert_eq!(exit_code(&result.unwrap_err()), 10, "{line}");
        }
        assert_eq!(fleet.queue.len(), 4);
    }

    #[test]
    fn empty_queue_and_heap_map_to_exit_code_five() {
        let mut fleet = Fleet::new(&AppConfig::default()).expect("fleet");
        let mut out = Vec::new();
        for command in [
            FleetCommand::Driver(DriverCommand::Peek),
            FleetCommand::Maintenance(MaintenanceCommand::ScheduleNext),
        ] {
            let err = execute(&mut fleet, &command, &mut out).unwrap_err();
            assert_eq!(exit_code(&err), 5);
        }
    }
}

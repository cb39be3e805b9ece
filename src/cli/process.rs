use std::{path::Path, process::Command};

use anyhow::{anyhow, bail, Result};
use sysinfo::{get_current_pid, Signal, System};
use tracing::info;

use crate::daemon::args::AccumulationArgs;

/// Terminates every process started from executable `name`, except the current one and its
/// children. Returns amount of stopped processes.
pub fn kill_previous_servers(name: &Path) -> Result<usize> {
    let system = System::new_all();
    let current_id = get_current_pid().map_err(|e| anyhow!("Can't get current pid: {e}"))?;
    let mut stopped = 0;
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }
        if matches!(process.parent(), Some(p) if p == current_id) {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| name == *v)
            .is_some()
        {
            info!("Stopping daemon {pid}");
            // This will forcefully terminate the process on Windows. Anything better will require a
            // lot more work.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
            stopped += 1;
        }
    }
    Ok(stopped)
}

/// Intended for shutting down previous daemon and starting new one. The daemon binary detaches on
/// its own, so this only waits for its launcher half to exit.
pub fn restart_server(
    daemon_path: &Path,
    application_dir: &Path,
    accumulation: AccumulationArgs,
) -> Result<()> {
    kill_previous_servers(daemon_path)?;

    let mut command = Command::new(daemon_path);
    command.arg("--dir").arg(application_dir);
    command.args(accumulation.to_command_args());

    info!("Spawning {:?}", command);
    let status = command.status()?;
    if !status.success() {
        bail!("Daemon failed to start: {status}");
    }
    Ok(())
}

use std::{env, path::Path, process::Stdio};

use anyhow::{anyhow, Result};
use sysinfo::{get_current_pid, Pid, Process, Signal, System};
use tracing::info;

use crate::daemon::args::ServeArgs;

/// Stops every other process running the executable at `exe`. Children of the current process
/// are left alone.
pub fn kill_previous_servers(exe: &Path) -> Result<()> {
    let system = System::new_all();
    let current = get_current_pid().map_err(|e| anyhow!("Can't get the current pid: {e}"))?;

    let daemons = system
        .processes()
        .iter()
        .filter(|(pid, process)| is_other_daemon(**pid, process, current, exe));
    for (pid, process) in daemons {
        info!("Stopping daemon with pid {pid}");
        // SIGTERM gives the daemon a chance to save its counters.
        if process.kill_with(Signal::Term).is_none() {
            process.kill();
        }
        process.wait();
    }
    Ok(())
}

fn is_other_daemon(pid: Pid, process: &Process, current: Pid, exe: &Path) -> bool {
    pid != current
        && process.parent() != Some(current)
        && process.exe().is_some_and(|path| path.exists() && path == exe)
}

/// Replaces a running daemon with a detached `serve` using the same options.
pub fn restart_server(serve: &ServeArgs) -> Result<()> {
    let exe = env::current_exe()?;
    kill_previous_servers(&exe)?;

    let mut command = std::process::Command::new(exe);
    command
        .args(serve.to_command_args())
        .stdin(Stdio::null())
        .stdout(Stdio::null());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    #[allow(clippy::zombie_processes)]
    let child = command.spawn()?;
    println!("Started keyrace daemon with pid {}", child.id());
    Ok(())
}

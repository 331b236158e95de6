use crossbeam_channel::{select, unbounded, Receiver, Sender};
use notify::{Event, RecursiveMode, Watcher};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use crate::diagnostics::CompileError;

/// Watch an Oluś file and automatically rerun it when changes are detected
pub fn watch_run(entry_file: &Path, no_clear: bool) -> Result<(), CompileError> {
    println!("Watching {} for changes...", entry_file.display());

    // Initial run
    let mut child = spawn_run(entry_file)
        .map_err(|e| CompileError::io(format!("failed to spawn process: {e}")))?;
    print_separator();

    // Setup file watcher
    let (tx, rx) = unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher
        .watch(entry_file, RecursiveMode::NonRecursive)
        .map_err(|e| {
            CompileError::io(format!(
                "failed to watch file {}: {e}",
                entry_file.display()
            ))
        })?;

    // Event loop
    loop {
        // Wait for file change
        wait_for_change(&rx);

        // Debounce
        debounce_events(&rx);

        // Kill running process
        graceful_kill(&mut child)
            .map_err(|e| CompileError::io(format!("failed to kill process: {e}")))?;

        // Clear terminal
        if !no_clear {
            clearscreen::clear().ok();
        }

        println!("File changed, rerunning...");
        match spawn_run(entry_file) {
            Ok(new_child) => {
                child = new_child;
                print_separator();
            }
            Err(e) => {
                eprintln!("Error spawning process: {e}");
                print_separator();
                // Continue watching even if spawn fails
                child = Command::new("true")
                    .spawn()
                    .map_err(|e| CompileError::io(e.to_string()))?;
            }
        }
    }
}

/// Run the entry file in a child process, so a looping program can be killed
/// and the watcher survives runtime errors.
fn spawn_run(entry_file: &Path) -> std::io::Result<Child> {
    let exe = std::env::current_exe()?;
    Command::new(exe)
        .arg("run")
        .arg(entry_file)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
}

/// Kill a process gracefully (SIGTERM, then SIGKILL after timeout)
fn graceful_kill(child: &mut Child) -> std::io::Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use std::thread;

    let pid = Pid::from_raw(child.id() as i32);

    // Send SIGTERM
    let _ = kill(pid, Signal::SIGTERM);

    // Poll for 1 second
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_secs(1) {
        if child.try_wait()?.is_some() {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(50));
    }

    // Still running, send SIGKILL
    let _ = kill(pid, Signal::SIGKILL);
    child.wait()?;
    Ok(())
}

/// Wait for the first file change event
fn wait_for_change(rx: &Receiver<Event>) {
    // Block until we get an event
    let _ = rx.recv();
}

/// Debounce events by waiting for a quiet period
fn debounce_events(rx: &Receiver<Event>) {
    loop {
        select! {
            recv(rx) -> _event => {
                // Got another event, keep waiting
            }
            default(Duration::from_millis(100)) => {
                // No events for 100ms, we're done
                break;
            }
        }
    }
}

/// Create a file watcher with the given sender
fn create_watcher(tx: Sender<Event>) -> Result<notify::RecommendedWatcher, CompileError> {
    notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            // Only react to write events
            if matches!(
                event.kind,
                notify::EventKind::Modify(_) | notify::EventKind::Create(_)
            ) {
                let _ = tx.send(event);
            }
        }
    })
    .map_err(|e| CompileError::io(format!("failed to create file watcher: {e}")))
}

/// Print a separator line
fn print_separator() {
    println!("\n{}\n", "=".repeat(60));
}

/*!
 * Cooperative Kernel - Main Entry Point
 *
 * Interactive host loop: reads one command per line, dispatches it to the
 * shell, then advances the scheduler by exactly one tick.
 */

use coop_kernel::monitoring::span_command;
use coop_kernel::shell::status_line;
use coop_kernel::{init_tracing, NoopWork, ProcessManager, Reply, SchedulerConfig, Shell};
use miette::IntoDiagnostic;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();

    let config = SchedulerConfig::from_env().into_diagnostic()?;
    info!(
        quantum_ms = config.default_quantum.as_millis() as u64,
        default_priority = config.default_priority,
        "Kernel starting"
    );

    let manager = ProcessManager::with_config(config);
    let init = manager.spawn("init", NoopWork);
    info!(pid = init, "Spawned init process");

    let shell = Shell::new(manager.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut seq: u64 = 0;

    println!("{}", status_line(&manager));
    loop {
        prompt()?;

        let line = tokio::select! {
            line = lines.next_line() => line.into_diagnostic()?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        };
        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };

        seq += 1;
        let span = span_command(line.trim(), seq);
        let _entered = span.enter();

        match shell.execute(&line) {
            Ok(Reply::Text(text)) if text.is_empty() => {}
            Ok(Reply::Text(text)) => println!("{text}"),
            Ok(Reply::Exit) => break,
            Err(e) => {
                warn!(error = %e, "command failed");
                println!("error: {e}");
            }
        }

        // One scheduling tick per processed command
        let outcome = manager.advance();
        span.record_outcome(&outcome);
    }

    let stats = manager.scheduler_statistics();
    info!(
        context_switches = stats.context_switches,
        preemptions = stats.preemptions,
        terminated = stats.terminated_count,
        "Kernel shutting down"
    );
    Ok(())
}

fn prompt() -> miette::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "kernel> ").into_diagnostic()?;
    stdout.flush().into_diagnostic()
}

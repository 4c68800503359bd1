/*!
 * Heap Simulator - Main Entry Point
 *
 * Runs one command against the persisted heap:
 * - Loads heap and graph snapshots (or starts fresh)
 * - Executes the command
 * - Saves state back when the command mutated it
 */

use heapsim_kernel::cli::USAGE;
use heapsim_kernel::{init_tracing, Command, HeapConfig, SimError, Session};
use tracing::debug;

fn main() -> miette::Result<()> {
    let config = HeapConfig::from_env().map_err(SimError::from)?;
    init_tracing(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("Usage: {USAGE}");
        std::process::exit(1);
    }

    let command = Command::parse(&args).map_err(SimError::from)?;
    debug!(
        command = command.name(),
        heap_file = %config.heap_file.display(),
        "Opening session"
    );

    let mut session = Session::open(&config)?;
    let output = session.execute(&command)?;
    print!("{output}");
    Ok(())
}

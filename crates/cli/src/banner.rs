//! Startup banner

use console::style;

/// Print the one-time startup banner
pub fn print() {
    println!();
    println!("  Sonic: a CLI tool for managing a Sonic CDN");
    println!();
    println!("  {} sonic connect", style("Get started =>").white().bold());
    println!();
}

/// Whether the banner should be shown for this invocation.
///
/// `args` is the full argv including the program name. The banner is
/// suppressed only for two-argument invocations ending in `--json`
/// (e.g. `sonic users --json`), and never shown for longer ones.
pub fn should_show(args: &[String]) -> bool {
    match args.len() {
        0..=2 => true,
        3 => args[2] != "--json",
        _ => false,
    }
}

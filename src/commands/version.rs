//! Command: print version information.

/// Version string baked in at build time, falling back to the crate version.
pub const VERSION: &str = match option_env!("DEVSETUP_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Print the devsetup version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("devsetup {VERSION}");
}

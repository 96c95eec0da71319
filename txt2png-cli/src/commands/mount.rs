//! Mount command - expose a backing directory through the PNG overlay.

use txt2png::config::format_size;
use txt2png::service::{FuseMountConfig, FuseMountService};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the mount command.
pub struct MountArgs {
    pub source: String,
    pub mountpoint: String,
    pub placeholder_size: Option<u64>,
    pub debug: bool,
}

/// Run the mount command.
pub fn run(args: MountArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("mount");
    let config = runner.config();

    // CLI > config > default
    let placeholder_size = args
        .placeholder_size
        .unwrap_or(config.overlay.placeholder_size);

    FuseMountService::validate_paths(&args.source, &args.mountpoint)?;

    let mount_config = FuseMountConfig::new().with_placeholder_size(placeholder_size);

    println!("txt2png Overlay Mount v{}", txt2png::VERSION);
    println!("========================");
    println!();
    println!("Source:           {}", args.source);
    println!("Mountpoint:       {}", args.mountpoint);
    println!("Placeholder size: {}", format_size(placeholder_size));
    println!("Log file:         {}", config.logging.file.display());
    println!();
    println!("Mounting read-only overlay...");
    println!("  Backend:     fuse3 (async multi-threaded)");
    println!("  Other files: Passed through from source");
    println!("  Text files:  Shown as .png, rendered on read");
    println!();
    println!("Press Ctrl+C to unmount and exit");
    println!();

    let runtime = runner.runtime()?;
    FuseMountService::mount_fuse3_blocking(
        &mount_config,
        &args.source,
        &args.mountpoint,
        runtime.handle(),
    )
    .map_err(CliError::Serve)?;

    println!();
    println!("Filesystem unmounted.");
    Ok(())
}

use clap::Parser;
use folder_digest::{
    Cli, FolderDigest, FolderDigestError, OutputFormatter, OutputMode, UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let digest = match FolderDigest::from_cli(&cli) {
        Ok(digest) => digest,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    let Some(path) = cli.path.as_deref() else {
        digest.output_formatter().error("No input path given");
        return 2;
    };

    if cli.dry_run {
        return handle_dry_run(path, &digest);
    }

    match digest.process_path(path) {
        Ok(report) => {
            digest.output_formatter().print_process_report(&report);
            // Per-file failures are reported but do not fail the run.
            0
        }
        Err(e) => {
            digest.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &FolderDigestError) -> i32 {
    match error {
        FolderDigestError::InvalidPath { .. } | FolderDigestError::UnsupportedInput { .. } => 2,
        FolderDigestError::Archive { .. } => 3,
        FolderDigestError::Config { .. } => 4,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "folder-digest.toml".to_string());

    match FolderDigest::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  folder-digest <path> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(path: &std::path::Path, digest: &FolderDigest) -> i32 {
    let formatter = digest.output_formatter();

    formatter.print_header("Dry run");
    formatter.info("No document will be written");

    let plan = match digest.plan(path) {
        Ok(plan) => plan,
        Err(e) => {
            digest.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    let config = digest.config();
    formatter.info("Configuration that would be used:");
    println!("  Exclude directories: {}", config.filters.exclude_dirs.join(", "));
    println!("  Max depth: {}", config.filters.max_depth);
    println!("  Output directory: {}", config.output.base_directory.display());

    formatter.print_separator();
    formatter.info("Digest plan:");
    println!(
        "  Input: {} ({})",
        plan.name,
        if plan.archive { "zip archive" } else { "folder" }
    );
    println!("  Output file: {}", plan.output_path.display());
    println!("  Files to include: {}", plan.files.len());
    println!();
    println!("{}", plan.structure);

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to write the document");

    0
}

fn print_startup_error(error: &FolderDigestError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

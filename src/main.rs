use analytics_aggregator::{
    Aggregator, AggregatorError, Cli, OutputFormatter, OutputMode, UserFriendlyError, VideoScanner,
};
use clap::Parser;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let aggregator = match Aggregator::from_cli(&cli) {
        Ok(aggregator) => aggregator,
        Err(e) => {
            print_startup_error(&cli, &e);
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&aggregator);
    }

    match aggregator.run() {
        Ok(report) => {
            let formatter = aggregator.output_formatter();
            formatter.success("Aggregation complete!");
            formatter.print_run_report(&report);
            0
        }
        Err(e) => {
            aggregator.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli.config_path_for_generation();

    match Aggregator::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nEdit root_directory and reports_directory, then run:");
            println!("  analytics-aggregator --config {}", config_path.display());
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

fn handle_dry_run(aggregator: &Aggregator) -> i32 {
    let formatter = aggregator.output_formatter();

    formatter.print_header("DRY RUN - no reports will be written");

    let scanner = VideoScanner::new();
    let videos = match aggregator.scan_videos(&scanner) {
        Ok(videos) => videos,
        Err(e) => {
            aggregator.handle_error(&e);
            return 1;
        }
    };

    formatter.print_scan_plan(&videos);
    formatter.print_separator();

    let stats = scanner.get_statistics(&videos);
    let paths = aggregator.paths();
    if formatter.mode() != OutputMode::Json {
        print!("{}", stats.display_summary());
        println!("Reports that would be written:");
        println!("  {}", paths.content_report_path().display());
        println!("  {}", paths.traffic_source_report_path().display());
    }

    formatter.success("Dry run completed successfully");
    0
}

fn print_startup_error(cli: &Cli, error: &AggregatorError) {
    let mode = match cli.output_format {
        analytics_aggregator::OutputFormat::Json => OutputMode::Json,
        analytics_aggregator::OutputFormat::Plain => OutputMode::Plain,
        analytics_aggregator::OutputFormat::Human => OutputMode::Human,
    };
    let formatter = OutputFormatter::new(mode, 0, false);
    formatter.print_user_friendly_error(error);
}

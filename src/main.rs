//
//  bucket-cloner
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bucket_cloner::cli::{Cli, Commands};
use bucket_cloner::exit_codes;

#[tokio::main]
async fn main() {
    // Initialize logging
    init_logging();

    // Usage errors exit with 1; help and version exit with 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                exit_codes::ERROR
            } else {
                exit_codes::SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Execute command
    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("BUCKETCLONER_DEBUG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Workspace(cmd) => cmd.run(&cli.global).await.map(|_| exit_codes::SUCCESS),
        Commands::Project(cmd) => cmd.run(&cli.global).await.map(|_| exit_codes::SUCCESS),
        Commands::Clone(cmd) => cmd.run(&cli.global, &cli.clone).await,
        Commands::Completion(cmd) => cmd.run().await.map(|_| exit_codes::SUCCESS),
    }
}

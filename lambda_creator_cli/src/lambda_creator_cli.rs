// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
use clap::Parser;
use lambda_creator_cli::{output, Args, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    if !args.template.is_empty() {
        lambda_creator_api::util::create_template(&args.template, lambda_creator::lambda_creator_default_conf().as_str())?;
        return Ok(());
    }

    let settings = lambda_creator_cli::load_settings(&args)?;
    let output_format = args.output;
    let command = match args.command {
        None => {
            log::debug!("Bye");
            return Ok(());
        }
        Some(command) => command,
    };

    // Validation does not need credentials.
    if let Commands::Validate(create_args) = &command {
        let result = lambda_creator_cli::validate(create_args)?;
        println!("{}", output::format_output(&serde_json::to_value(&result)?, output_format)?);
        return Ok(result.into_result()?);
    }

    let mut creator = lambda_creator::lambda_creator_connect(&settings, lambda_creator_api::telemetry::EventHandle::logger()).await;
    let res = lambda_creator_cli::execute(command, &mut creator, &settings).await?;
    println!("{}", output::format_output(&res, output_format)?);
    Ok(())
}

// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
pub mod output;

use lambda_creator_api::common::LambdaCreatorResult;
use lambda_creator_api::function::*;
use lambda_creator_api::util::parse_json_arg;
use lambda_creator_api::validation::{validate_input_parameters, validate_update_parameters, ValidationResult};

pub const DEFAULT_CONFIG_FILE: &str = "lambda_creator.toml";

#[derive(Debug, clap::Args)]
pub struct CreateArgs {
    /// Name of the ECR repository holding the image
    #[arg(long)]
    pub ecr_repo: String,
    #[arg(long)]
    pub lambda_name: String,
    /// Existing execution role, a new one is created if omitted
    #[arg(long)]
    pub role_name: Option<String>,
    #[arg(long, default_value_t = String::from(DEFAULT_IMAGE_TAG))]
    pub image_tag: String,
    /// Memory size in MB
    #[arg(long, default_value_t = DEFAULT_MEMORY_SIZE)]
    pub memory: i32,
    /// Timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT)]
    pub timeout: i32,
    #[arg(long, default_value_t = String::from(""))]
    pub description: String,
    /// Environment variables as a JSON object
    #[arg(long)]
    pub env_vars: Option<String>,
    /// Tags as a JSON object
    #[arg(long)]
    pub tags: Option<String>,
    /// {"SubnetIds": [...], "SecurityGroupIds": [...]}
    #[arg(long)]
    pub vpc_config: Option<String>,
    /// Delete the function first if it already exists
    #[arg(long)]
    pub force_delete: bool,
    #[arg(long)]
    pub skip_validation: bool,
}

impl CreateArgs {
    pub fn to_request(&self) -> LambdaCreatorResult<CreationRequest> {
        let mut request = CreationRequest::new(&self.lambda_name, &self.ecr_repo);
        request.role_name = self.role_name.clone();
        request.image_tag = self.image_tag.clone();
        request.memory_size = self.memory;
        request.timeout = self.timeout;
        request.description = self.description.clone();
        request.environment = parse_json_arg("env-vars", self.env_vars.as_deref())?;
        request.tags = parse_json_arg("tags", self.tags.as_deref())?;
        request.vpc_config = parse_json_arg("vpc-config", self.vpc_config.as_deref())?;
        Ok(request)
    }
}

#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub lambda_name: String,
    /// Switch the function to an image of this repository
    #[arg(long)]
    pub ecr_repo: Option<String>,
    #[arg(long, default_value_t = String::from(DEFAULT_IMAGE_TAG))]
    pub image_tag: String,
    #[arg(long)]
    pub role_name: Option<String>,
    #[arg(long)]
    pub memory: Option<i32>,
    #[arg(long)]
    pub timeout: Option<i32>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub env_vars: Option<String>,
    #[arg(long)]
    pub vpc_config: Option<String>,
    #[arg(long)]
    pub skip_validation: bool,
}

impl UpdateArgs {
    pub fn to_request(&self) -> LambdaCreatorResult<UpdateRequest> {
        let mut request = UpdateRequest::new(&self.lambda_name);
        request.repository_name = self.ecr_repo.clone();
        request.image_tag = self.image_tag.clone();
        request.role_name = self.role_name.clone();
        request.memory_size = self.memory;
        request.timeout = self.timeout;
        request.description = self.description.clone();
        request.environment = parse_json_arg("env-vars", self.env_vars.as_deref())?;
        request.vpc_config = parse_json_arg("vpc-config", self.vpc_config.as_deref())?;
        Ok(request)
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum RoleCommands {
    /// Create a role with access to all the S3 buckets
    Create {},
    /// Delete a role together with its policies
    Delete { role_name: String },
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Create a function from a container image
    Create(CreateArgs),
    /// Update the image and/or the configuration of a function
    Update(UpdateArgs),
    Delete {
        #[arg(long)]
        lambda_name: String,
    },
    Invoke {
        #[arg(long)]
        lambda_name: String,
        /// JSON payload
        #[arg(long)]
        payload: Option<String>,
        /// RequestResponse, Event or DryRun
        #[arg(long, default_value = "RequestResponse")]
        invocation_type: InvocationType,
    },
    Get {
        #[arg(long)]
        lambda_name: String,
    },
    List {
        /// Defaults to `list_max_items` of the configuration
        #[arg(long)]
        max_items: Option<i32>,
    },
    /// Only validate the parameters of a create
    Validate(CreateArgs),
    Role {
        #[command(subcommand)]
        role_command: RoleCommands,
    },
}

#[derive(Debug, clap::Parser)]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_FILE))]
    pub config_file: String,
    #[arg(short, long, default_value_t = String::from(""))]
    pub template: String,
    #[arg(long, global = true)]
    pub region: Option<String>,
    #[arg(long, global = true)]
    pub profile: Option<String>,
    #[arg(long, global = true, value_enum, default_value_t = output::OutputFormat::Json)]
    pub output: output::OutputFormat,
}

/// Settings from the configuration file, if any, overridden by the command line.
pub fn load_settings(args: &Args) -> anyhow::Result<lambda_creator::LambdaCreatorSettings> {
    let mut settings = match std::fs::metadata(&args.config_file) {
        Ok(_) => toml::from_str::<lambda_creator::LambdaCreatorSettings>(&std::fs::read_to_string(&args.config_file)?)?,
        Err(_) if args.config_file == DEFAULT_CONFIG_FILE => lambda_creator::LambdaCreatorSettings::default(),
        Err(_) => anyhow::bail!("configuration file does not exist or cannot be accessed: {}", &args.config_file),
    };
    if let Some(region) = &args.region {
        settings.region = Some(region.clone());
    }
    if let Some(profile) = &args.profile {
        settings.profile = Some(profile.clone());
    }
    Ok(settings)
}

/// Validate a create without contacting any control plane.
pub fn validate(args: &CreateArgs) -> anyhow::Result<ValidationResult> {
    let request = args.to_request()?;
    Ok(validate_input_parameters(&request))
}

fn check(result: ValidationResult, skip: bool) -> anyhow::Result<()> {
    if skip {
        log::warn!("Skipping parameter validation");
        return Ok(());
    }
    Ok(result.into_result()?)
}

pub async fn execute(
    command: Commands,
    creator: &mut lambda_creator::LambdaCreator,
    settings: &lambda_creator::LambdaCreatorSettings,
) -> anyhow::Result<serde_json::Value> {
    let res = match command {
        Commands::Create(create_args) => {
            let request = create_args.to_request()?;
            check(validate_input_parameters(&request), create_args.skip_validation)?;
            log::info!(
                "Creating Lambda function {} from ECR repository {}",
                request.function_name,
                request.repository_name
            );
            let configuration = match create_args.force_delete {
                true => creator.functions.create_or_replace(request).await?,
                false => creator.functions.create(request).await?,
            };
            serde_json::to_value(configuration)?
        }
        Commands::Update(update_args) => {
            let request = update_args.to_request()?;
            check(validate_update_parameters(&request), update_args.skip_validation)?;
            serde_json::to_value(creator.functions.update(request).await?)?
        }
        Commands::Delete { lambda_name } => serde_json::to_value(creator.functions.delete(&lambda_name).await?)?,
        Commands::Invoke {
            lambda_name,
            payload,
            invocation_type,
        } => {
            let payload: Option<serde_json::Value> = parse_json_arg("payload", payload.as_deref())?;
            serde_json::to_value(creator.functions.invoke(&lambda_name, payload, invocation_type).await?)?
        }
        Commands::Get { lambda_name } => serde_json::to_value(creator.functions.get(&lambda_name).await?)?,
        Commands::List { max_items } => {
            let functions = creator.functions.list(max_items.unwrap_or(settings.list_max_items)).await?;
            serde_json::json!({ "Functions": functions })
        }
        Commands::Validate(create_args) => serde_json::to_value(validate(&create_args)?)?,
        Commands::Role { role_command } => match role_command {
            RoleCommands::Create {} => serde_json::to_value(creator.roles.create_role_with_storage_access().await?)?,
            RoleCommands::Delete { role_name } => {
                creator.roles.teardown(&role_name).await?;
                serde_json::json!({ "RoleName": role_name, "Deleted": true })
            }
        },
    };
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_create() {
        let args = Args::try_parse_from([
            "lambda_creator_cli",
            "--region",
            "eu-west-1",
            "create",
            "--ecr-repo",
            "repo",
            "--lambda-name",
            "f1",
            "--memory",
            "512",
            "--env-vars",
            r#"{"ENV": "prod"}"#,
            "--force-delete",
        ])
        .unwrap();
        assert_eq!(Some("eu-west-1".to_string()), args.region);
        assert_eq!(output::OutputFormat::Json, args.output);
        match args.command {
            Some(Commands::Create(create_args)) => {
                assert!(create_args.force_delete);
                assert!(!create_args.skip_validation);
                let request = create_args.to_request().unwrap();
                assert_eq!("f1", request.function_name);
                assert_eq!("repo", request.repository_name);
                assert_eq!("latest", request.image_tag);
                assert_eq!(512, request.memory_size);
                assert_eq!(30, request.timeout);
                assert_eq!("prod", request.environment.unwrap()["ENV"]);
                assert!(request.tags.is_none());
                assert!(request.role_name.is_none());
            }
            cmd => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_parse_update() {
        let args = Args::try_parse_from([
            "lambda_creator_cli",
            "update",
            "--lambda-name",
            "f1",
            "--timeout",
            "60",
            "--output",
            "text",
        ])
        .unwrap();
        assert_eq!(output::OutputFormat::Text, args.output);
        match args.command {
            Some(Commands::Update(update_args)) => {
                let request = update_args.to_request().unwrap();
                assert_eq!(Some(60), request.timeout);
                assert!(request.repository_name.is_none());
                assert!(request.memory_size.is_none());
            }
            cmd => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_parse_invoke() {
        let args = Args::try_parse_from(["lambda_creator_cli", "invoke", "--lambda-name", "f1", "--invocation-type", "Event"]).unwrap();
        match args.command {
            Some(Commands::Invoke {
                invocation_type, payload, ..
            }) => {
                assert_eq!(InvocationType::Event, invocation_type);
                assert!(payload.is_none());
            }
            cmd => panic!("unexpected command: {:?}", cmd),
        }

        assert!(Args::try_parse_from(["lambda_creator_cli", "invoke", "--lambda-name", "f1", "--invocation-type", "Sync"]).is_err());
        assert!(Args::try_parse_from(["lambda_creator_cli", "create", "--lambda-name", "f1"]).is_err());
    }

    #[test]
    fn test_parse_role() {
        let args = Args::try_parse_from(["lambda_creator_cli", "role", "delete", "my-role"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Role { role_command: RoleCommands::Delete { role_name } }) if role_name == "my-role"));
    }

    #[test]
    fn test_malformed_json_argument() {
        let args = Args::try_parse_from([
            "lambda_creator_cli",
            "create",
            "--ecr-repo",
            "repo",
            "--lambda-name",
            "f1",
            "--tags",
            "{oops",
        ])
        .unwrap();
        match args.command {
            Some(Commands::Create(create_args)) => assert!(create_args.to_request().is_err()),
            cmd => panic!("unexpected command: {:?}", cmd),
        }
    }

    #[test]
    fn test_validate() {
        let args = Args::try_parse_from([
            "lambda_creator_cli",
            "validate",
            "--ecr-repo",
            "repo",
            "--lambda-name",
            "f1",
            "--memory",
            "100",
        ])
        .unwrap();
        match args.command {
            Some(Commands::Validate(create_args)) => {
                let result = validate(&create_args).unwrap();
                assert!(!result.valid);
                assert_eq!(lambda_creator_api::validation::INVALID_MEMORY_SIZE, result.message);
                assert!(check(result, false).is_err());
            }
            cmd => panic!("unexpected command: {:?}", cmd),
        }
        assert!(check(ValidationResult::failed("bad"), true).is_ok());
    }

    #[test]
    fn test_load_settings() {
        let args = Args::try_parse_from(["lambda_creator_cli", "--profile", "dev", "list"]).unwrap();
        let settings = load_settings(&args).unwrap();
        assert_eq!(Some("dev".to_string()), settings.profile);
        assert_eq!(50, settings.list_max_items);

        let args = Args::try_parse_from(["lambda_creator_cli", "-c", "/nonexistent/lambda_creator.toml", "list"]).unwrap();
        assert!(load_settings(&args).is_err());
    }

    fn command(args: &[&str]) -> Commands {
        Args::try_parse_from(args.iter().copied()).unwrap().command.unwrap()
    }

    #[tokio::test]
    async fn test_execute_list_default_max_items() {
        lambda_creator::test_utils::init_logger();
        let cloud = lambda_creator::test_utils::MockCloud::default().with_functions(&["f1", "f2", "f3", "f4"]);
        let (mut creator, mut receiver) = cloud.lambda_creator();
        let settings = lambda_creator::LambdaCreatorSettings {
            list_max_items: 3,
            ..Default::default()
        };

        let res = execute(command(&["lambda_creator_cli", "list"]), &mut creator, &settings).await.unwrap();
        assert_eq!(3, res["Functions"].as_array().unwrap().len());
        assert_eq!("f1", res["Functions"][0]["FunctionName"]);
        assert_eq!(
            vec![lambda_creator::test_utils::MockEvent::ListFunctions(None, 3)],
            lambda_creator::test_utils::drain(&mut receiver)
        );

        let res = execute(command(&["lambda_creator_cli", "list", "--max-items", "1"]), &mut creator, &settings)
            .await
            .unwrap();
        assert_eq!(1, res["Functions"].as_array().unwrap().len());
    }

    #[tokio::test]
    async fn test_execute_role_delete() {
        lambda_creator::test_utils::init_logger();
        let (mut creator, mut receiver) = lambda_creator::test_utils::MockCloud::default().with_role("r1").lambda_creator();
        let settings = lambda_creator::LambdaCreatorSettings::default();

        let res = execute(command(&["lambda_creator_cli", "role", "delete", "r1"]), &mut creator, &settings)
            .await
            .unwrap();
        assert_eq!(serde_json::json!({ "RoleName": "r1", "Deleted": true }), res);
        assert_eq!(
            vec![
                lambda_creator::test_utils::MockEvent::ListAttachedRolePolicies("r1".to_string()),
                lambda_creator::test_utils::MockEvent::ListRolePolicies("r1".to_string()),
                lambda_creator::test_utils::MockEvent::DeleteRole("r1".to_string()),
            ],
            lambda_creator::test_utils::drain(&mut receiver)
        );
    }

    #[tokio::test]
    async fn test_execute_create_validation() {
        lambda_creator::test_utils::init_logger();
        let cloud = lambda_creator::test_utils::MockCloud::default().with_repository("repo", "123.dkr.ecr.r.amazonaws.com/repo").with_role("exec");
        let (mut creator, mut receiver) = cloud.lambda_creator();
        let settings = lambda_creator::LambdaCreatorSettings::default();
        let create = ["lambda_creator_cli", "create", "--ecr-repo", "repo", "--lambda-name", "f1", "--role-name", "exec", "--memory", "100"];

        assert!(execute(command(&create), &mut creator, &settings).await.is_err());
        assert!(lambda_creator::test_utils::drain(&mut receiver).is_empty());

        let mut skipped = create.to_vec();
        skipped.push("--skip-validation");
        let res = execute(command(&skipped), &mut creator, &settings).await.unwrap();
        assert_eq!("f1", res["FunctionName"]);
        assert_eq!(3, lambda_creator::test_utils::drain(&mut receiver).len());
    }
}

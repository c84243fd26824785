//! `docadmin`: admin CLI for document-service IAM policies.
//!
//! Edits statement files offline (`validate`, `fmt`), inspects the
//! catalogs (`resolve`, `label`, `actions`, `resource-types`) and manages
//! policies and their attachments in the local IAM database.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docadmin_core::ServiceConfig;

use commands::Env;

/// Document admin IAM tool.
#[derive(Parser, Debug)]
#[command(name = "docadmin", about = "Document admin IAM policy tool")]
struct Cli {
    /// Catalog config file (default: <data-dir>/catalog.toml).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Directory holding iam.sqlite and catalog.toml (default: current dir).
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a raw statement file (`-` for stdin).
    Validate { file: String },

    /// Pretty-print a raw statement file.
    Fmt {
        file: String,
        /// Rewrite the file in place.
        #[arg(long, short = 'w')]
        write: bool,
    },

    /// Build a resource URN from a type id and identifier (`*` for all).
    Resolve { resource_type: String, id: String },

    /// Human labels for resource URNs.
    Label {
        #[arg(required = true)]
        urns: Vec<String>,
    },

    /// List the action catalog.
    Actions,

    /// List registered resource types.
    #[command(name = "resource-types")]
    ResourceTypes,

    /// Policy management.
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },

    /// Attach a policy to a user or group URN.
    Attach { policy_id: String, principal: String },

    /// Detach a policy by attachment id.
    Detach { policy_id: String, attachment_id: String },

    /// List attachments of a policy.
    Attachments { policy_id: String },

    /// List policies attached to a user or group.
    #[command(name = "principal-policies")]
    PrincipalPolicies { principal: String },

    /// List policies that can still be attached to a user or group.
    Attachable { principal: String },
}

#[derive(Subcommand, Debug)]
enum PolicyAction {
    /// Create a policy, optionally with statements from a raw file.
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(short = 'f', long = "file")]
        file: Option<String>,
    },
    /// List policies by name.
    List {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
    },
    /// Show a policy with labelled statements.
    Show { id: String },
    /// Replace a policy's statements with the contents of a raw file.
    Save {
        id: String,
        #[arg(short = 'f', long = "file")]
        file: String,
    },
    /// Delete a policy and its attachments.
    Delete {
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

fn main() {
    // Logs go to stderr so `-o json` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.output == "json";

    if let Err(err) = run(cli, json) {
        commands::report_error(&err, json);
        std::process::exit(1);
    }
}

fn run(cli: Cli, json: bool) -> anyhow::Result<()> {
    let env = Env::new(
        ServiceConfig {
            data_dir: cli.data_dir,
            catalog_path: cli.config,
            ..Default::default()
        },
        json,
    );

    match cli.command {
        Commands::Validate { file } => commands::statements::validate(&env, &file)?,
        Commands::Fmt { file, write } => commands::statements::fmt(&file, write)?,

        Commands::Resolve { resource_type, id } => {
            commands::catalog::resolve(&env, &resource_type, &id)?;
        }
        Commands::Label { urns } => commands::catalog::label(&env, &urns)?,
        Commands::Actions => commands::catalog::actions(&env)?,
        Commands::ResourceTypes => commands::catalog::resource_types(&env)?,

        Commands::Policy { action } => match action {
            PolicyAction::Create {
                name,
                description,
                file,
            } => {
                commands::policy::create(&env, &name, description, file.as_deref())?;
            }
            PolicyAction::List { limit, offset } => {
                commands::policy::list(&env, limit, offset)?;
            }
            PolicyAction::Show { id } => commands::policy::show(&env, &id)?,
            PolicyAction::Save { id, file } => commands::policy::save(&env, &id, &file)?,
            PolicyAction::Delete { id, yes } => {
                if !yes {
                    eprint!("Delete policy {} and all its attachments? [y/N]: ", id);
                    let mut s = String::new();
                    std::io::stdin().read_line(&mut s)?;
                    if !s.trim().eq_ignore_ascii_case("y") {
                        println!("Cancelled.");
                        return Ok(());
                    }
                }
                commands::policy::delete(&env, &id)?;
            }
        },

        Commands::Attach {
            policy_id,
            principal,
        } => commands::attach::attach(&env, &policy_id, &principal)?,
        Commands::Detach {
            policy_id,
            attachment_id,
        } => commands::attach::detach(&env, &policy_id, &attachment_id)?,
        Commands::Attachments { policy_id } => {
            commands::attach::attachments(&env, &policy_id)?;
        }
        Commands::PrincipalPolicies { principal } => {
            commands::attach::principal_policies(&env, &principal)?;
        }
        Commands::Attachable { principal } => {
            commands::attach::attachable(&env, &principal)?;
        }
    }

    Ok(())
}

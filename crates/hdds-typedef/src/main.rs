// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! hdds-typedef - Print type descriptors for message and service types
//!
//! # Usage
//!
//! ```bash
//! # Single descriptor
//! hdds-typedef -p /opt/ros/noetic/share msg geometry_msgs/Pose
//!
//! # Full closure as JSON
//! hdds-typedef -p /opt/ros/noetic/share --json msg geometry_msgs/PoseStamped --recursive
//!
//! # Service halves
//! hdds-typedef srv-request nav_msgs/GetPlan -r
//! hdds-typedef srv-response nav_msgs/GetPlan
//!
//! # Using configuration file
//! hdds-typedef --config typedef.toml list
//! hdds-typedef validate -c typedef.toml
//! ```

use clap::{Parser, Subcommand};
use hdds_typedef::{DefinitionRegistry, Introspector, TypeDescriptor, TypedefConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// HDDS type introspection
#[derive(Parser, Debug)]
#[command(name = "hdds-typedef")]
#[command(about = "Print type descriptors for message and service types")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Package directory to search (can repeat)
    #[arg(short = 'p', long = "package-path", global = true)]
    package_paths: Vec<PathBuf>,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Describe a message type
    Msg {
        /// Message type (package/Name)
        type_name: String,

        /// Include every type reachable through fields
        #[arg(short, long)]
        recursive: bool,
    },

    /// Describe a service's request type
    SrvRequest {
        /// Service type (package/Name)
        service_type: String,

        /// Include every type reachable through fields
        #[arg(short, long)]
        recursive: bool,
    },

    /// Describe a service's response type
    SrvResponse {
        /// Service type (package/Name)
        service_type: String,

        /// Include every type reachable through fields
        #[arg(short, long)]
        recursive: bool,
    },

    /// List known message and service types
    List,

    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "typedef.toml")]
        output: PathBuf,
    },

    /// Validate the configuration file given with --config
    Validate,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match &args.command {
        Commands::GenConfig { output } => return cmd_gen_config(output),
        Commands::Validate => {
            let path = args
                .config
                .as_deref()
                .ok_or("validate requires --config <FILE>")?;
            return cmd_validate(path);
        }
        _ => {}
    }

    let config = build_config(&args)?;

    // Initialize logging
    let level = args.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let registry = config.load_registry()?;
    let introspector = Introspector::with_options(registry, config.descriptor_options());

    match args.command {
        Commands::Msg {
            type_name,
            recursive,
        } => {
            if recursive {
                print_closure(&introspector.type_descriptor_closure(&type_name)?, args.json)
            } else {
                match introspector.type_descriptor(&type_name)? {
                    Some(descriptor) => print_descriptor(&descriptor, args.json),
                    None if args.json => {
                        println!("null");
                        Ok(())
                    }
                    None => {
                        println!("{} is atomic and has no descriptor", type_name);
                        Ok(())
                    }
                }
            }
        }
        Commands::SrvRequest {
            service_type,
            recursive,
        } => {
            if recursive {
                print_closure(
                    &introspector.service_request_descriptor_closure(&service_type)?,
                    args.json,
                )
            } else {
                print_descriptor(
                    &introspector.service_request_descriptor(&service_type)?,
                    args.json,
                )
            }
        }
        Commands::SrvResponse {
            service_type,
            recursive,
        } => {
            if recursive {
                print_closure(
                    &introspector.service_response_descriptor_closure(&service_type)?,
                    args.json,
                )
            } else {
                print_descriptor(
                    &introspector.service_response_descriptor(&service_type)?,
                    args.json,
                )
            }
        }
        Commands::List => cmd_list(introspector.registry(), args.json),
        Commands::GenConfig { .. } | Commands::Validate => Ok(()),
    }
}

fn build_config(args: &Args) -> Result<TypedefConfig, Box<dyn std::error::Error>> {
    let mut config = match args.config {
        Some(ref path) => {
            let mut config = TypedefConfig::from_file(path)?;
            config.apply_env();
            config
        }
        None => TypedefConfig::from_env(),
    };

    // Command line paths first, then the file, then the environment.
    let mut paths = args.package_paths.clone();
    paths.append(&mut config.package_paths);
    config.package_paths = paths;
    config.validate()?;

    if config.package_paths.is_empty() {
        return Err(format!(
            "No package paths (use --package-path, a config file, or set {})",
            hdds_typedef::config::ENV_PACKAGE_PATH
        )
        .into());
    }
    Ok(config)
}

fn print_descriptor(
    descriptor: &TypeDescriptor,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(descriptor)?);
    } else {
        print_text(descriptor);
    }
    Ok(())
}

fn print_closure(
    closure: &[TypeDescriptor],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(closure)?);
    } else {
        for (i, descriptor) in closure.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_text(descriptor);
        }
    }
    Ok(())
}

fn print_text(descriptor: &TypeDescriptor) {
    println!("{}", descriptor.type_name);
    let width = descriptor
        .fields()
        .map(|f| f.type_name.len() + f.arity.to_string().len())
        .max()
        .unwrap_or(0);
    for field in descriptor.fields() {
        let declared = format!("{}{}", field.type_name, field.arity);
        println!(
            "  {:<width$} {}  (example: {})",
            declared,
            field.name,
            field.example,
            width = width
        );
    }
    for (name, value) in descriptor.constants() {
        println!("  const {} = {}", name, value);
    }
}

fn cmd_list(registry: &DefinitionRegistry, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let listing = serde_json::json!({
            "messages": registry.message_types().collect::<Vec<_>>(),
            "services": registry.service_types().collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Messages:");
    for name in registry.message_types() {
        println!("  {}", name);
    }
    println!("Services:");
    for name in registry.service_types() {
        println!("  {}", name);
    }
    Ok(())
}

fn cmd_gen_config(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = TypedefConfig::default();
    config.add_package_path("/opt/ros/noetic/share");

    let toml_str = toml::to_string_pretty(&config)?;
    let content = format!(
        r#"# HDDS Typedef Configuration
# Generated by hdds-typedef gen-config
#
# constant_order: "lexicographic" | "declaration"
# malformed_field_type: "reject" | "scalar"

{}
"#,
        toml_str
    );

    std::fs::write(output, content)?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match TypedefConfig::from_file(config_path) {
        Ok(config) => {
            println!("Configuration valid!");
            println!();
            println!("Package paths: {}", config.package_paths.len());
            for path in &config.package_paths {
                println!("  {}", path.display());
            }
            println!("Constant order: {:?}", config.constant_order);
            println!("Malformed field types: {:?}", config.malformed_field_type);
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}

//! Build profile resolver CLI
//!
//! Resolves, checks and renders Android build profiles from a
//! `buildprofile.toml` declaration.

use anyhow::Result;
use buildprofile_android::declaration::{lint_declaration, ResolutionInputs};
use buildprofile_android::framework::{FrameworkDefaults, FRAMEWORK_PROPERTIES};
use buildprofile_android::gradle;
use buildprofile_android::plugins::OPTIONAL_PLUGINS;
use buildprofile_android::settings::KNOWN_SETTINGS;
use buildprofile_android::signing::BuildType;
use buildprofile_android::{ProfileResolver, ResolvedProfile};
use buildprofile_cli::output::{format_count, Status};
use buildprofile_core::config::Declaration;
use buildprofile_core::error::{exit_codes, Error};
use buildprofile_core::feature_flags::Flag;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "buildprofile")]
#[command(about = "Resolve and validate Android build profiles")]
#[command(version)]
struct Cli {
    /// Declaration file path (default: search buildprofile.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the build profile and print it
    Resolve {
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate the declaration and report warnings
    Check {
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Render the resolved profile as build.gradle.kts
    Render {
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List known settings, framework properties and feature flags
    Explain,
}

#[derive(Args)]
struct ResolveArgs {
    /// Build type to resolve: debug, profile, release or custom
    #[arg(long)]
    build_type: Option<String>,

    /// Fail when a release build would be signed with the debug identity
    #[arg(long)]
    deny_debug_signing: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    init_logging(cli.verbose, cli.quiet);

    let config = cli.config.as_deref();
    let exit_code = match cli.command {
        Commands::Resolve { resolve, format } => run_resolve(config, &resolve, &format),
        Commands::Check { resolve, strict } => run_check(config, &resolve, strict),
        Commands::Render { resolve, output } => run_render(config, &resolve, output.as_deref()),
        Commands::Explain => run_explain(config),
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "off",
        (false, 0) => "error",
        (false, 1) => "info",
        (false, _) => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("buildprofile_android={level},buildprofile_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Loaded declaration, ready to resolve
struct Loaded {
    declaration: Declaration,
    inputs: ResolutionInputs,
}

fn load(config: Option<&Path>, args: &ResolveArgs) -> Result<Loaded, Error> {
    let declaration = Declaration::load(config)?;
    let mut inputs = ResolutionInputs::from_schema(&declaration.schema)?;

    inputs.declaration.features = inputs
        .declaration
        .features
        .clone()
        .with_env_overrides(|name| std::env::var(name).ok());
    if let Some(build_type) = &args.build_type {
        inputs.options.build_type = Some(BuildType::from(build_type.as_str()));
    }
    if args.deny_debug_signing {
        inputs.options.deny_debug_signing = true;
    }

    Ok(Loaded { declaration, inputs })
}

fn resolve(loaded: &Loaded) -> Result<ResolvedProfile, Error> {
    let inputs = &loaded.inputs;
    let resolver = ProfileResolver::new(inputs.framework.clone(), inputs.options.clone());
    Ok(resolver.resolve(&inputs.declaration)?)
}

fn report_error(error: &Error) -> i32 {
    Status::error(&error.message);
    if let Some(context) = &error.context {
        Status::hint(context);
    }
    if let Some(suggestion) = &error.suggestion {
        Status::hint(suggestion);
    }
    error.exit_code()
}

fn describe_source(declaration: &Declaration) -> String {
    match &declaration.path {
        Some(path) => format!("Using {}", path.display()),
        None => "No declaration file found; using defaults".to_string(),
    }
}

fn run_resolve(config: Option<&Path>, args: &ResolveArgs, format: &str) -> i32 {
    let json = format == "json";
    let outcome = load(config, args).and_then(|loaded| resolve(&loaded).map(|r| (loaded, r)));

    let (loaded, resolved) = match outcome {
        Ok(result) => result,
        Err(e) if json => {
            match serde_json::to_string_pretty(&e.to_report()) {
                Ok(report) => println!("{report}"),
                Err(_) => Status::error(&e.message),
            }
            return e.exit_code();
        }
        Err(e) => return report_error(&e),
    };

    if json {
        return match serde_json::to_string_pretty(&resolved) {
            Ok(output) => {
                println!("{output}");
                exit_codes::SUCCESS
            }
            Err(e) => report_error(&Error::from(e)),
        };
    }

    Status::info(&describe_source(&loaded.declaration));
    print_profile(&resolved);
    print_warnings(&resolved);
    exit_codes::SUCCESS
}

fn print_profile(resolved: &ResolvedProfile) {
    let profile = &resolved.profile;

    Status::header(&format!("Build profile ({})", profile.build_type()));
    Status::field("applicationId", profile.application_id());
    Status::field("namespace", profile.namespace());
    Status::field(
        "minSdk / targetSdk / compileSdk",
        &format!(
            "{} / {} / {}",
            profile.min_sdk(),
            profile.target_sdk(),
            profile.compile_sdk()
        ),
    );
    if let Some(ndk) = profile.ndk_version() {
        Status::field("ndkVersion", ndk);
    }
    Status::field(
        "version",
        &format!("{} ({})", profile.version_name(), profile.version_code()),
    );
    Status::field(
        "source / target compatibility",
        &format!(
            "{} / {}",
            profile.source_compatibility(),
            profile.target_compatibility()
        ),
    );
    Status::field("jvmTarget", &profile.jvm_target().jvm_target());
    Status::field("desugaringEnabled", &profile.desugaring_enabled().to_string());
    Status::field("multiDexEnabled", &profile.multi_dex_enabled().to_string());
    Status::field("signingConfig", profile.signing_config().name());
    Status::field("plugins", &profile.plugins().join(", "));
    for dependency in profile.dependencies() {
        Status::field(dependency.configuration.as_str(), &dependency.notation());
    }
    Status::field(
        "gradle tasks",
        &format!(
            "{}, {}",
            gradle::assemble_task(profile.build_type()),
            gradle::bundle_task(profile.build_type())
        ),
    );
    println!();
}

fn print_warnings(resolved: &ResolvedProfile) {
    for warning in &resolved.warnings {
        Status::warning(&format!("{}: {}", warning.field(), warning));
    }
}

fn run_check(config: Option<&Path>, args: &ResolveArgs, strict: bool) -> i32 {
    let loaded = match load(config, args) {
        Ok(loaded) => loaded,
        Err(e) => return report_error(&e),
    };
    Status::info(&describe_source(&loaded.declaration));

    let lint = lint_declaration(&loaded.declaration.schema);
    for warning in lint.warnings() {
        Status::warning(&warning.to_string());
    }

    let resolved = match resolve(&loaded) {
        Ok(resolved) => resolved,
        Err(e) => return report_error(&e),
    };
    print_warnings(&resolved);

    let warning_count = lint.warnings().len() + resolved.warnings.len();
    let summary = format_count(warning_count, "warning", "warnings");
    if strict && warning_count > 0 {
        Status::error(&format!("Declaration has {summary} (strict mode)"));
        return exit_codes::VALIDATION_ERROR;
    }

    Status::success(&format!(
        "{} resolves for {} ({summary})",
        resolved.profile.application_id(),
        resolved.profile.build_type()
    ));
    exit_codes::SUCCESS
}

fn run_render(config: Option<&Path>, args: &ResolveArgs, output: Option<&Path>) -> i32 {
    let outcome = load(config, args).and_then(|loaded| resolve(&loaded).map(|r| (loaded, r)));
    let (loaded, resolved) = match outcome {
        Ok(result) => result,
        Err(e) => return report_error(&e),
    };

    print_warnings(&resolved);
    let kts = gradle::render_kts(&resolved.profile, &loaded.inputs.declaration.signing);

    match output {
        Some(path) => match std::fs::write(path, kts) {
            Ok(()) => {
                Status::success(&format!("Wrote {}", path.display()));
                exit_codes::SUCCESS
            }
            Err(e) => report_error(&Error::from(e)),
        },
        None => {
            print!("{kts}");
            exit_codes::SUCCESS
        }
    }
}

fn run_explain(config: Option<&Path>) -> i32 {
    let declaration = match Declaration::load(config) {
        Ok(declaration) => declaration,
        Err(e) => return report_error(&e),
    };
    Status::info(&describe_source(&declaration));

    Status::header("Settings");
    for (key, description) in KNOWN_SETTINGS {
        Status::field(key, description);
    }

    let framework = FrameworkDefaults::from_config(&declaration.schema.framework);
    Status::header(&format!("Framework properties ({})", framework.name));
    for (property, setting) in FRAMEWORK_PROPERTIES {
        let value = framework
            .property(property)
            .map_or_else(
                || "not supplied".to_string(),
                |v| format!("{v} (defaults {setting})"),
            );
        Status::field(&format!("{}.{property}", framework.name), &value);
    }

    Status::header("Feature flags");
    for optional in OPTIONAL_PLUGINS {
        let flag = Flag::new(optional.flag, false);
        Status::field(
            optional.flag,
            &format!(
                "{} ({}, env {})",
                optional.description,
                optional.plugin_id,
                flag.env_var()
            ),
        );
    }

    println!();
    exit_codes::SUCCESS
}

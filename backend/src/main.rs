//! Tourney Ingest CLI - extract tournament spreadsheets to TournamentData JSON
//!
//! # Main Commands
//!
//! ```bash
//! tourney-ingest serve                     # Start HTTP server (port 3000)
//! tourney-ingest extract season.json       # Extract a grid to TournamentData JSON
//! tourney-ingest profile list              # Manage sheet profiles
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! tourney-ingest headers season.csv        # Show header classification
//! tourney-ingest stage "Semis"             # Classify a round name
//! tourney-ingest validate out.json         # Validate TournamentData JSON
//! ```

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tourney_ingest::{
    classify_header, classify_stage, detect_dialect, extract_file, parse_file_auto,
    validate_tournament_json, DialectKind, ExtractOptions, ProfileRegistry,
};

#[derive(Parser)]
#[command(name = "tourney-ingest")]
#[command(
    about = "Normalize tournament spreadsheets into canonical tournament data",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full extraction: grid file → TournamentData JSON
    Extract {
        /// Input grid (JSON or CSV)
        input: PathBuf,

        /// Sheet dialect: legacy, spl-middle, modern (auto-detect if not specified)
        #[arg(short, long)]
        dialect: Option<DialectKind>,

        /// Route through a stored profile
        #[arg(long, conflicts_with = "dialect")]
        profile: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip validation
        #[arg(long)]
        no_validate: bool,

        /// Do not save a new profile
        #[arg(long)]
        no_save: bool,

        /// Ignore the profile registry entirely
        #[arg(long)]
        no_profiles: bool,

        /// Profile registry directory
        #[arg(long, env = "TOURNEY_INGEST_PROFILES")]
        profiles_dir: Option<PathBuf>,
    },

    /// Show how a grid's header row is classified
    Headers {
        /// Input grid (JSON or CSV)
        input: PathBuf,
    },

    /// Classify a round name into a stage
    Stage {
        /// Round name, e.g. "Week 3" or "Semis"
        name: String,
    },

    /// Validate a TournamentData JSON file against the schema
    Validate {
        /// Input JSON file
        input: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,
    },

    /// Manage sheet profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List all stored profiles
    List,

    /// Show details of a profile
    Show {
        /// Profile ID
        id: String,
    },

    /// Delete a profile
    Delete {
        /// Profile ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            dialect,
            profile,
            output,
            no_validate,
            no_save,
            no_profiles,
            profiles_dir,
        } => {
            let options = ExtractOptions {
                dialect,
                profile,
                profile_name: None,
                profiles_dir: profiles_dir.map(|p| p.to_string_lossy().to_string()),
                no_profiles,
                no_save,
                skip_validation: no_validate,
            };
            cmd_extract(&input, &options, output.as_deref())
        }

        Commands::Headers { input } => cmd_headers(&input),

        Commands::Stage { name } => cmd_stage(&name),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Serve { port } => cmd_serve(port).await,

        Commands::Profile { action } => cmd_profile(action),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    input: &Path,
    options: &ExtractOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = extract_file(input, options)?;

    eprintln!("\n📊 Summary");
    eprintln!("   Dialect: {} ({:?})", result.dialect, result.dialect_source);
    if let Some(generation) = result.default_generation {
        eprintln!("   Default generation: {}", generation);
    }
    eprintln!("   {}", result.tournament.summary());
    eprintln!(
        "   Raw records: {}, duplicates dropped: {}, unparsed cells: {}",
        result.raw_match_count, result.duplicates_dropped, result.unparsed_cells
    );
    if let Some(ref pid) = result.profile_id {
        eprintln!("   Profile: {}", pid);
    }
    if !result.validation_errors.is_empty() {
        eprintln!("   ⚠️  {} validation problems", result.validation_errors.len());
    }

    let json = serde_json::to_string_pretty(&result.tournament)?;
    write_output(&json, output)?;

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_headers(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing grid: {}", input.display());

    let parsed = parse_file_auto(input)?;
    parsed.grid.check_structure()?;
    let header = parsed.grid.header_values();
    let (columns, rounds) = classify_header(&header);

    eprintln!("   Encoding: {}", parsed.encoding);
    if let Some(d) = parsed.delimiter {
        eprintln!("   Delimiter: '{}'", format_delimiter(d));
    }
    eprintln!("   Rows: {}", parsed.grid.row_count());

    let show = |label: &str, index: Option<usize>| match index {
        Some(i) => println!("  {:<8} [{}] {}", label, i, header[i]),
        None => println!("  {:<8} -", label),
    };
    show("Player", columns.player);
    show("Team", columns.team);
    show("Cost", columns.price);
    show("Tier", columns.tier);

    println!("  Rounds:");
    for &i in &rounds {
        println!("    [{}] {} ({})", i, header[i], classify_stage(&header[i]).as_str());
    }

    eprintln!("\n🧭 Detected dialect: {}", detect_dialect(&parsed.grid, &rounds));
    Ok(())
}

fn cmd_stage(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", classify_stage(name).as_str());
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let data: Value = serde_json::from_str(&content)?;

    match validate_tournament_json(&data) {
        Ok(()) => {
            eprintln!("✅ Valid tournament data");
            Ok(())
        }
        Err(errors) => {
            eprintln!("\n❌ {} problems:", errors.len());
            for err in errors.iter().take(10) {
                eprintln!("   - {}", err);
            }
            std::process::exit(1);
        }
    }
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    tourney_ingest::server::start_server(port).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

fn cmd_profile(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = ProfileRegistry::new();

    match action {
        ProfileAction::List => {
            let profiles = registry.list();
            if profiles.is_empty() {
                eprintln!("📋 No profiles stored yet.");
                eprintln!("   Profiles are saved automatically by 'tourney-ingest extract'.");
                return Ok(());
            }

            eprintln!("📋 Stored profiles ({}):\n", profiles.len());
            for p in profiles {
                println!("  📄 {} ({})", p.name, p.id);
                println!("     Dialect: {}", p.dialect);
                println!("     Columns: {}", p.header_columns.join(", "));
                println!("     Uses: {}", p.use_count);
                if let Some(ref last) = p.last_used {
                    println!("     Last used: {}", last);
                }
                println!();
            }
        }

        ProfileAction::Show { id } => match registry.get(&id) {
            Some(p) => {
                println!("📄 Profile: {} ({})\n", p.name, p.id);
                println!("Dialect: {}", p.dialect);
                println!("Header: {}", p.header_columns.join(", "));
                println!("Created: {}", p.created_at);
                println!("Uses: {}", p.use_count);
            }
            None => {
                return Err(format!("Profile not found: {}", id).into());
            }
        },

        ProfileAction::Delete { id } => {
            registry.delete(&id)?;
            eprintln!("🗑️  Profile deleted: {}", id);
        }
    }

    Ok(())
}

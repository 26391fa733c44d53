//! Craftplan - Command Line Interface
//!
//! This is the main entry point for the crafting calculator.
//! Run with `--help` to see all available options.

use clap::{Parser, Subcommand};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use craftplan::{
    data::{list_sources, DirectorySource},
    display::{display_calculation, format_duration, write_totals_csv},
    models::{Recipe, RecipeVariant},
    session::CraftingSession,
    store::JsonFileStore,
    variants::{normalize, resolve},
};

/// Command-line arguments for Craftplan.
#[derive(Parser, Debug)]
#[command(name = "craftplan")]
#[command(author, version, about = "Work out the base materials and crafts needed for an item", long_about = None)]
struct Cli {
    /// JSON file holding custom recipes, variant preferences and the selected source
    #[arg(short, long, env = "CRAFTPLAN_STORE", default_value = "craftplan_store.json")]
    store: PathBuf,

    /// Directory of imported recipe sources (<source>.json)
    #[arg(long, env = "CRAFTPLAN_SOURCES", default_value = "recipes")]
    sources: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add or replace a custom recipe
    Add {
        /// Item the recipe produces
        name: String,

        /// Units produced per craft
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        produces: u32,

        /// Ingredient as NAME=AMOUNT (repeatable; AMOUNT defaults to 1)
        #[arg(short, long = "ingredient", value_parser = parse_ingredient, required = true)]
        ingredients: Vec<(String, u32)>,

        /// Hours per craft
        #[arg(short, long, value_parser = parse_hours)]
        time: Option<f64>,

        /// Add as a named variant instead of replacing the whole recipe
        #[arg(long)]
        variant: Option<String>,
    },

    /// Delete a custom recipe
    Remove {
        /// Item whose custom recipe to delete
        name: String,
    },

    /// List every item that can be calculated
    List,

    /// List every ingredient used by any recipe
    Ingredients,

    /// Show all recipes, imported first
    Recipes,

    /// List the available imported recipe sources
    Sources,

    /// Select an imported recipe source, or show the current one
    Source {
        /// Source id to load
        id: Option<String>,

        /// Use custom recipes only
        #[arg(long, conflicts_with = "id")]
        none: bool,
    },

    /// Choose which variant of an item's recipe to use
    Prefer {
        /// Item name as listed by `list`
        item: String,

        /// Variant index (0 is the first)
        index: usize,
    },

    /// Calculate the requirements for an item
    Calc {
        /// Item to craft
        item: String,

        /// How many to craft
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
        quantity: u64,

        /// Show the full breakdown tree
        #[arg(short, long)]
        tree: bool,

        /// Print base-material totals as CSV instead
        #[arg(long, conflicts_with = "tree")]
        csv: bool,
    },
}

fn parse_ingredient(value: &str) -> Result<(String, u32), String> {
    let (name, amount) = match value.rsplit_once('=') {
        Some((name, amount)) => {
            let amount: u32 = amount
                .trim()
                .parse()
                .map_err(|_| format!("invalid amount in \"{value}\""))?;
            (name, amount)
        }
        None => (value, 1),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing ingredient name in \"{value}\""));
    }
    if amount == 0 {
        return Err(format!("amount for \"{name}\" must be at least 1"));
    }
    Ok((name.to_string(), amount))
}

fn parse_hours(value: &str) -> Result<f64, String> {
    let hours: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of hours \"{value}\""))?;
    if !(hours >= 0.0 && hours.is_finite()) {
        return Err(format!("crafting time must be a non-negative number of hours, got {value}"));
    }
    Ok(hours)
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("craftplan=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .init();
}

fn describe(recipe: &Recipe) -> Vec<String> {
    normalize(recipe)
        .iter()
        .map(|variant| {
            let ingredients = variant
                .ingredients
                .iter()
                .map(|(name, amount)| format!("{} x {}", amount, name))
                .collect::<Vec<_>>()
                .join(", ");
            let time = if variant.crafting_time() > 0.0 {
                format!(", {}", format_duration(variant.crafting_time()))
            } else {
                String::new()
            };
            format!(
                "[{}] produces {}{} <- {}",
                variant.name, variant.produces, time, ingredients
            )
        })
        .collect()
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let store = JsonFileStore::open(&cli.store)?;
    let mut session = CraftingSession::open(store)?;
    let source = DirectorySource::new(&cli.sources);

    if !matches!(cli.command, Commands::Source { .. } | Commands::Sources) {
        if let Err(err) = session.restore_source(&source) {
            eprintln!("[WARNING] {}", err);
        }
    }

    match cli.command {
        Commands::Add {
            name,
            produces,
            ingredients,
            time,
            variant,
        } => {
            let mut recipe = RecipeVariant::new(produces, ingredients);
            if let Some(hours) = time {
                recipe = recipe.with_crafting_time(hours);
            }
            match variant {
                Some(label) => {
                    session.upsert_variant(&name, recipe.named(label.clone()))?;
                    println!("Saved variant \"{}\" of {}.", label, name.trim());
                }
                None => {
                    session.add_recipe(&name, Recipe::from(recipe))?;
                    println!("Saved recipe for {}.", name.trim());
                }
            }
        }

        Commands::Remove { name } => {
            if session.remove_recipe(&name)? {
                println!("Deleted recipe for \"{}\".", name);
            } else {
                println!("No custom recipe named \"{}\".", name);
            }
        }

        Commands::List => {
            let items = session.item_names();
            if items.is_empty() {
                println!("No recipes available. Use 'add' or 'source' first.");
            } else {
                for item in items {
                    println!("{}", item);
                }
            }
        }

        Commands::Ingredients => {
            for name in session.ingredient_names() {
                println!("{}", name);
            }
        }

        Commands::Recipes => {
            let catalog = session.catalog();
            if catalog.imported().is_empty() && catalog.custom().is_empty() {
                println!("No recipes available.");
            }

            if !catalog.imported().is_empty() {
                println!(
                    "[GAME RECIPES: {}] ({})",
                    session.source_name().unwrap_or("imported"),
                    catalog.imported().len()
                );
                for (name, recipe) in catalog.imported() {
                    println!("  {}", name);
                    for line in describe(recipe) {
                        println!("    {}", line);
                    }
                }
            }

            if !catalog.custom().is_empty() {
                println!("[CUSTOM RECIPES] ({})", catalog.custom().len());
                for (name, recipe) in catalog.custom() {
                    println!("  {}", catalog.merged_key(name));
                    for line in describe(recipe) {
                        println!("    {}", line);
                    }
                }
            }
        }

        Commands::Sources => {
            let ids = list_sources(source.root())?;
            if ids.is_empty() {
                println!("No recipe sources in {}.", source.root().display());
            }
            for id in ids {
                let marker = if session.selected_source() == Some(id.as_str()) { "*" } else { " " };
                println!("{} {}", marker, id);
            }
        }

        Commands::Source { id, none } => {
            if none {
                session.select_source(None, &source)?;
                println!("Custom recipes only.");
            } else if let Some(id) = id {
                let count = session.select_source(Some(&id), &source)?;
                println!(
                    "Loaded {} recipes from {}.",
                    count,
                    session.source_name().unwrap_or(&id)
                );
            } else {
                match session.selected_source() {
                    Some(current) => println!("{}", current),
                    None => println!("Custom recipes only."),
                }
            }
        }

        Commands::Prefer { item, index } => {
            session.set_preference(&item, index)?;
            let view = session.catalog().merged_view();
            match view
                .get(&item)
                .and_then(|recipe| resolve(&item, recipe, session.preferences()))
            {
                Some(variant) => println!("{} will use variant \"{}\".", item, variant.name),
                None => println!("Stored preference; {} has no recipe yet.", item),
            }
        }

        Commands::Calc {
            item,
            quantity,
            tree,
            csv,
        } => {
            let calculation = session.calculate(&item, quantity)?;
            if csv {
                write_totals_csv(&calculation.totals, io::stdout())?;
            } else {
                display_calculation(&calculation, tree);
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

use chrono::Local;
use clap::{Parser, Subcommand};
use image::ImageFormat;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

mod day;
mod error;
mod photo;
mod state;
mod widget;

use day::cutover::{has_cutover_passed, CutoverTime};
use day::ordering::WeekOrdering;
use error::Result;
use photo::store::ImageStore;
use state::data::Slot;
use state::prefs::PrefStore;
use state::settings::WidgetSettings;
use widget::render::{render, RenderInstruction, Trigger};
use widget::schedule::next_fire_time;

/// Photo-per-weekday widget
#[derive(Parser, Debug)]
#[command(name = "week-widget", version, about)]
struct Cli {
    /// Directory holding the preference store
    #[arg(long, env = "WEEK_WIDGET_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory holding the per-day PNG cache
    #[arg(long, env = "WEEK_WIDGET_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the week grid: every slot with its photo and cache state
    List {
        #[arg(long)]
        json: bool,
    },
    /// Assign a photo to a slot (0..=6)
    Set { slot: Slot, locator: String },
    /// Print the photo assigned to a slot
    Show { slot: Slot },
    /// Work out what the widget shows for a trigger
    Render {
        #[arg(long, value_enum, default_value = "widget-update")]
        trigger: Trigger,
        /// Host action string to dispatch instead of --trigger
        #[arg(long, conflicts_with = "trigger")]
        action: Option<String>,
        /// Write the rounded bitmap here (PNG)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Show or set the daily cutover time (HH:MM)
    Cutover { time: Option<CutoverTime> },
    /// Show or set the week layout: monday, sunday, or 7 comma-separated weekdays
    WeekStart { ordering: Option<WeekOrdering> },
    /// Print when the daily refresh fires next
    NextUpdate,
}

/// One cell of the week grid
#[derive(Serialize, Debug)]
struct GridEntry {
    slot: Slot,
    label: &'static str,
    locator: Option<String>,
    cached: bool,
    today: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let prefs = match &cli.data_dir {
        Some(dir) => PrefStore::open(&dir.join("prefs.db"))?,
        None => PrefStore::open_default()?,
    };
    let cache_dir = match cli.cache_dir {
        Some(dir) => dir,
        None => ImageStore::default_cache_dir()?,
    };
    let store = ImageStore::new(prefs, cache_dir)?;
    info!("🗂️  Day cache at {}", store.cache_dir().display());

    // Settings are read once and passed down explicitly
    let mut settings = WidgetSettings::load(store.prefs())?;

    run(cli.command, &store, &mut settings).await?;
    Ok(())
}

async fn run(command: Command, store: &ImageStore, settings: &mut WidgetSettings) -> Result<()> {
    match command {
        Command::List { json } => {
            let entries = week_grid(store, settings)?;
            if json {
                println!("{}", to_json(&entries));
            } else {
                for entry in &entries {
                    println!(
                        "{} {} {:<12} {}{}",
                        if entry.today { "▶" } else { " " },
                        entry.slot,
                        entry.label,
                        entry.locator.as_deref().unwrap_or("Нет фото"),
                        if entry.locator.is_some() && !entry.cached { "  (not cached)" } else { "" },
                    );
                }
            }
        }
        Command::Set { slot, locator } => {
            let outcome = store.set_reference_async(slot, &locator).await?;
            println!("{}: {:?}", settings.week_start.label(slot), outcome);
        }
        Command::Show { slot } => match store.image_reference(slot)? {
            Some(reference) if reference.cached => println!("{}", reference.locator),
            Some(reference) => println!("{}  (not cached)", reference.locator),
            None => println!("Нет картинки для этого дня"),
        },
        Command::Render { trigger, action, out, json } => {
            let trigger = match action {
                Some(action) => match Trigger::from_action(&action) {
                    Some(trigger) => trigger,
                    None => {
                        info!("Ignoring host action {:?}", action);
                        return Ok(());
                    }
                },
                None => trigger,
            };
            let instruction = render(trigger, Local::now().naive_local(), settings, store);

            if let (RenderInstruction::Image { bitmap, .. }, Some(path)) = (&instruction, &out) {
                bitmap.save_with_format(path, ImageFormat::Png)?;
                info!("🖼️  Wrote widget bitmap to {}", path.display());
            }

            if json {
                println!("{}", to_json(&instruction.summary()));
            } else if let RenderInstruction::Label { text, .. } = &instruction {
                println!("{}", text);
            } else {
                println!("image for day {}", instruction.slot());
            }
        }
        Command::Cutover { time } => {
            if let Some(cutover) = time {
                settings.cutover = cutover;
                settings.save(store.prefs())?;
                info!("⏰ Cutover set to {}", cutover);
            }
            let state = if has_cutover_passed(settings.cutover) { "passed" } else { "pending" };
            println!("{} ({} today)", settings.cutover, state);
        }
        Command::WeekStart { ordering } => {
            if let Some(ordering) = ordering {
                settings.week_start = ordering;
                settings.save(store.prefs())?;
            }
            println!("{}", settings.week_start);
        }
        Command::NextUpdate => {
            let next = next_fire_time(Local::now().naive_local(), settings.cutover);
            println!("{}", next.format("%Y-%m-%d %H:%M"));
        }
    }

    Ok(())
}

/// Today's grid, in slot order
fn week_grid(store: &ImageStore, settings: &WidgetSettings) -> Result<Vec<GridEntry>> {
    let today = settings.resolver().resolve_index(0);
    let references = store.all_image_references()?;

    Ok(Slot::all()
        .zip(references)
        .map(|(slot, reference)| GridEntry {
            slot,
            label: settings.week_start.label(slot),
            cached: reference.as_ref().is_some_and(|r| r.cached),
            locator: reference.map(|r| r.locator),
            today: slot == today,
        })
        .collect())
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

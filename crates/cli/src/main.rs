// gridsheet CLI - headless operations on snapshot files
//
// Each invocation loads a snapshot blob, applies one operation through the
// store, and writes the blob back.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use gridsheet_config::Settings;
use gridsheet_engine::cell::{StylePatch, TextAlign};
use gridsheet_engine::snapshot::SheetSnapshot;
use gridsheet_engine::store::SheetStore;
use gridsheet_io::json;

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;

#[derive(Parser)]
#[command(name = "gsheet")]
#[command(about = "Spreadsheet engine operations on snapshot files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty snapshot file
    New {
        file: PathBuf,
        /// Rows in the new sheet (default from settings)
        #[arg(long)]
        rows: Option<usize>,
        /// Columns in the new sheet (default from settings)
        #[arg(long)]
        columns: Option<usize>,
    },

    /// Write a literal value into a cell
    Set {
        file: PathBuf,
        /// Cell identifier, e.g. B12
        cell: String,
        value: String,
    },

    /// Write a formula into a cell and store its result
    Formula {
        file: PathBuf,
        cell: String,
        /// Formula text, e.g. '=SUM(A1:A5)'
        formula: String,
    },

    /// Print a cell's display value (and formula, if any)
    Get { file: PathBuf, cell: String },

    /// Print dimensions and every populated cell
    Show { file: PathBuf },

    /// Update parts of a cell's style
    Style {
        file: PathBuf,
        cell: String,
        #[arg(long)]
        bold: Option<bool>,
        #[arg(long)]
        italic: Option<bool>,
        #[arg(long)]
        underline: Option<bool>,
        #[arg(long)]
        strikethrough: Option<bool>,
        #[arg(long)]
        font_size: Option<f32>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        background: Option<String>,
        #[arg(long)]
        align: Option<Align>,
        #[arg(long)]
        font: Option<String>,
    },

    /// Set a column's width in pixels
    Width {
        file: PathBuf,
        /// Column label, e.g. B
        column: String,
        width: f64,
    },

    /// Set a row's height in pixels
    Height {
        file: PathBuf,
        /// 1-based row number, e.g. 3
        row: String,
        height: f64,
    },

    /// Insert an empty row after a 0-based row index
    InsertRow { file: PathBuf, after: usize },

    /// Insert an empty column after a 0-based column index
    InsertCol { file: PathBuf, after: usize },

    /// Delete the row at a 0-based index
    DeleteRow { file: PathBuf, index: usize },

    /// Delete the column at a 0-based index
    DeleteCol { file: PathBuf, index: usize },

    /// Replace a substring in every cell value and formula
    Replace {
        file: PathBuf,
        find: String,
        replace: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Align {
    Left,
    Center,
    Right,
}

impl From<Align> for TextAlign {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => TextAlign::Left,
            Align::Center => TextAlign::Center,
            Align::Right => TextAlign::Right,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn load_store(path: &PathBuf) -> Result<SheetStore, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let snapshot = json::from_json(&contents)
        .map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
    Ok(SheetStore::from_snapshot(snapshot))
}

fn save_store(path: &PathBuf, store: &SheetStore) -> Result<(), String> {
    let blob = json::to_json(store.snapshot()).map_err(|e| e.to_string())?;
    fs::write(path, blob).map_err(|e| format!("cannot write {}: {}", path.display(), e))
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::New {
            file,
            rows,
            columns,
        } => {
            let settings = Settings::load();
            let snapshot = SheetSnapshot::new(
                rows.unwrap_or(settings.grid.rows),
                columns.unwrap_or(settings.grid.columns),
            );
            let store = SheetStore::from_snapshot(snapshot);
            save_store(&file, &store)
        }

        Commands::Set { file, cell, value } => {
            let mut store = load_store(&file)?;
            store
                .set_cell_value(&cell, &value)
                .map_err(|e| e.to_string())?;
            save_store(&file, &store)
        }

        Commands::Formula {
            file,
            cell,
            formula,
        } => {
            let mut store = load_store(&file)?;
            store
                .set_cell_formula(&cell, &formula)
                .map_err(|e| e.to_string())?;
            println!("{}", store.display_value(&cell));
            save_store(&file, &store)
        }

        Commands::Get { file, cell } => {
            let store = load_store(&file)?;
            match store.cell(&cell) {
                Some(cell) if cell.is_formula() => {
                    println!("{}\t{}", cell.value, cell.formula)
                }
                Some(cell) => println!("{}", cell.value),
                None => println!(),
            }
            Ok(())
        }

        Commands::Show { file } => {
            let store = load_store(&file)?;
            let snapshot = store.snapshot();
            println!(
                "{} rows x {} columns, {} populated",
                snapshot.total_rows,
                snapshot.total_columns,
                snapshot.cells.len()
            );
            for id in snapshot.cell_ids_ordered() {
                let cell = &snapshot.cells[&id];
                if cell.is_formula() {
                    println!("{}\t{}\t{}", id, cell.value, cell.formula);
                } else {
                    println!("{}\t{}", id, cell.value);
                }
            }
            Ok(())
        }

        Commands::Style {
            file,
            cell,
            bold,
            italic,
            underline,
            strikethrough,
            font_size,
            color,
            background,
            align,
            font,
        } => {
            let patch = StylePatch {
                bold,
                italic,
                underline,
                strikethrough,
                font_size,
                color,
                background_color: background,
                text_align: align.map(TextAlign::from),
                font_family: font,
            };
            let mut store = load_store(&file)?;
            store
                .set_cell_style(&cell, &patch)
                .map_err(|e| e.to_string())?;
            save_store(&file, &store)
        }

        Commands::Width {
            file,
            column,
            width,
        } => {
            let mut store = load_store(&file)?;
            store.set_column_width(&column, width);
            save_store(&file, &store)
        }

        Commands::Height { file, row, height } => {
            let mut store = load_store(&file)?;
            store.set_row_height(&row, height);
            save_store(&file, &store)
        }

        Commands::InsertRow { file, after } => {
            let mut store = load_store(&file)?;
            store.add_row(after);
            save_store(&file, &store)
        }

        Commands::InsertCol { file, after } => {
            let mut store = load_store(&file)?;
            store.add_column(after);
            save_store(&file, &store)
        }

        Commands::DeleteRow { file, index } => {
            let mut store = load_store(&file)?;
            store.delete_row(index);
            save_store(&file, &store)
        }

        Commands::DeleteCol { file, index } => {
            let mut store = load_store(&file)?;
            store.delete_column(index);
            save_store(&file, &store)
        }

        Commands::Replace {
            file,
            find,
            replace,
        } => {
            let mut store = load_store(&file)?;
            store.find_and_replace(&find, &replace);
            save_store(&file, &store)
        }
    }
}

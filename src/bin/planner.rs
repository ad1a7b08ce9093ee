use std::error::Error;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use book_planner::cache::FileStore;
use book_planner::client::GeminiClient;
use book_planner::config::{Config, API_KEY_VARIABLES};
use book_planner::{view, GeminiPlanner, Planner, TodoId};

/// A one-month writing calendar, with a strategist's advice
#[derive(Parser)]
#[command(name = "planner", version)]
#[command(about = "A one-month writing calendar, with a strategist's advice", long_about = None)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the data file (overrides the configuration file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the month, the to-do list of a day and its advice (the default)
    Show {
        /// Day to show (YYYY-MM-DD). Defaults to today, or the first day of the month
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Do not ask for advice
        #[arg(long)]
        no_advice: bool,
    },
    /// Add a todo to a day
    Add {
        text: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Mark a todo as done, or not done anymore
    Toggle {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a todo. Plan items cannot be deleted
    Delete {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Ask for the advice of a day
    Advice {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the book plan
    Plan,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config = config.with_api_key_from_env();
    if let Some(path) = cli.store {
        config.store_path = path;
    }
    config.validate()?;
    if config.api_key.is_empty() {
        println!("Set {} to get the book plan and daily advice.", API_KEY_VARIABLES.join(" or "));
    }

    let store = FileStore::open(&config.store_path);
    let client = GeminiClient::new(&config)?;
    let mut planner: GeminiPlanner = Planner::new(&config, store, client)?;

    // Failures have been logged, the calendar simply has no plan items yet
    let _ = planner.ensure_book_plan().await;

    let today = Local::now().date_naive();
    let command = cli.command.unwrap_or(Command::Show { date: None, no_advice: false });
    let pick = |date: Option<NaiveDate>, planner: &GeminiPlanner| {
        date.unwrap_or_else(|| planner.month().initial_selection(today))
    };

    match command {
        Command::Show { date, no_advice } => {
            let date = pick(date, &planner);
            if no_advice {
                planner.select_date(date)?;
            } else {
                planner.select_date_and_fetch(date).await?;
            }
            print!("{}", view::month_grid(planner.month(), planner.calendar(), planner.selected_date()));
            println!();
            print!("{}", view::day_detail(date, planner.todos(date)));
            if !no_advice {
                println!();
                print!("{}", view::advice_panel(planner.advice(), planner.is_advice_loading()));
            }
        },
        Command::Add { text, date } => {
            let date = pick(date, &planner);
            planner.select_date(date)?;
            match planner.add_todo(&text)? {
                Some(id) => println!("Added <{}>", id),
                None => println!("Nothing added: the text is blank"),
            }
            print!("{}", view::day_detail(date, planner.todos(date)));
        },
        Command::Toggle { id, date } => {
            let date = pick(date, &planner);
            if planner.toggle_todo(date, &TodoId::from(id.clone()))? == false {
                println!("No todo <{}> on {}", id, date);
            }
            print!("{}", view::day_detail(date, planner.todos(date)));
        },
        Command::Delete { id, date } => {
            let date = pick(date, &planner);
            if planner.delete_todo(date, &TodoId::from(id.clone()))? == false {
                println!("No todo <{}> on {}", id, date);
            }
            print!("{}", view::day_detail(date, planner.todos(date)));
        },
        Command::Advice { date } => {
            let date = pick(date, &planner);
            planner.select_date_and_fetch(date).await?;
            match planner.advice() {
                Some(advice) => print!("{}", view::advice_panel(Some(advice), false)),
                None => println!("No advice for {} (see the logs, e.g. with RUST_LOG=info)", date),
            }
        },
        Command::Plan => match planner.book_plan() {
            None => println!("No book plan yet"),
            Some(plan) => {
                for (date, task) in plan.iter() {
                    println!("{}  {}", date, task);
                }
            },
        },
    }

    Ok(())
}

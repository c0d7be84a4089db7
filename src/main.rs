use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tokio::net::TcpListener;

use fitbear::api::{self, AppState};
use fitbear::commands::{food_cmd, CommandHandler, CommandOutcome};
use fitbear::config::AppConfig;
use fitbear::database::Database;
use fitbear::food::DietProfile;

const CLI_USER: &str = "cli";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Fitbear: Indian-menu nutrition coach", long_about = None)]
struct Args {
    #[arg(long, default_value = "3000")]
    port: u16,

    /// SQLite file; overrides DATABASE_PATH
    #[arg(long)]
    db: Option<PathBuf>,

    /// Chat with Coach C in the terminal instead of serving the API
    #[arg(long)]
    coach: bool,

    /// Score a menu text file and exit
    #[arg(long)]
    menu: Option<PathBuf>,

    /// Score without the vegetarian preference
    #[arg(long)]
    non_veg: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let diet = DietProfile {
        veg_flag: !args.non_veg,
    };

    if let Some(menu) = &args.menu {
        let result = food_cmd::score_menu_file(menu, &diet).await?;
        println!("{}", food_cmd::format_recommendations(&result));
        return Ok(());
    }

    let mut config = AppConfig::from_env();
    if let Some(db) = &args.db {
        config.database_path = db.display().to_string();
    }

    let db = Database::new(&config.database_path).await?;

    if args.coach {
        run_coach_mode(config, db, diet).await
    } else {
        run_api_server(config, db, args.port).await
    }
}

async fn run_coach_mode(
    config: AppConfig,
    db: Database,
    diet: DietProfile,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState::new(config, db);
    let mut command_handler = CommandHandler::new(state.llm.clone(), state.db.clone(), CLI_USER, diet);

    // Show initial help menu
    command_handler.handle_command("help").await?;

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    loop {
        match rl.readline("👤 ") {
            Ok(line) => {
                let input = line.trim();
                let _ = rl.add_history_entry(input);

                match command_handler.handle_command(input).await {
                    Ok(CommandOutcome::Exit) => break,
                    Ok(CommandOutcome::Continue) => {}
                    Err(e) => println!("{}", e.red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

async fn run_api_server(
    config: AppConfig,
    db: Database,
    port: u16,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log::info!("Starting API server on {}", addr);

    let app = api::create_api(AppState::new(config, db));

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Server successfully bound to {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}

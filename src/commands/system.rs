use colored::Colorize;

use super::CommandOutcome;

pub fn handle_command(input: &str) -> Result<CommandOutcome, String> {
    match input.to_lowercase().as_str() {
        "help" => {
            println!("\n{}", "🥗 Coach C Commands:".bright_green().bold());
            println!("  Just type your question about food, fitness or nutrition");
            println!("  Examples:");
            println!("    - is poha a good breakfast for fat loss?");
            println!("    - how much protein do I need on a vegetarian diet?");
            println!();

            println!("{}", "🍛 Menu Commands:".bright_green().bold());
            println!("  menu <file>      - Score the dishes in a menu text file");
            println!("  score <dishes>   - Score dishes separated by commas");
            println!("  veg on|off       - Toggle the vegetarian preference");
            println!();

            println!("{}", "📒 Food Log Commands:".bright_green().bold());
            println!("  log <dish> [servings]  - Log a catalog dish for today");
            println!("  today                  - Show today's log and totals");
            println!();

            println!("{}", "🧮 Tools:".bright_green().bold());
            println!("  tdee <male|female> <age> <height_cm> <weight_kg> [activity]");
            println!("  Example: tdee male 28 175 70 moderate");
            println!();

            println!("{}", "⚙️ System Commands:".bright_green().bold());
            println!("  help  - Show this help menu");
            println!("  exit  - Exit the program");
            Ok(CommandOutcome::Continue)
        }
        "exit" | "quit" => {
            println!("👋 Goodbye! Small wins add up.");
            Ok(CommandOutcome::Exit)
        }
        _ => Err("Unknown system command. Type 'help' for available commands.".to_string()),
    }
}

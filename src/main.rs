use clap::Parser;
use craftwatch::cli::handler::{handle_action, HandlerAction};
use craftwatch::cli::{
    handle_completions, handle_config_init, query, Cli, Commands, ConfigCommands,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn print_output(result: CliResult<String>) -> CliResult<()> {
    let output = result?;
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Watch(args) => craftwatch::cli::watch::run_watch(args).await,
        Commands::Calendar(args) => print_output(query::handle_calendar(&args).await),
        Commands::Status(args) => print_output(query::handle_status(&args).await),
        Commands::Health(args) => print_output(query::handle_health(&args).await),
        Commands::Winners(args) => print_output(query::handle_winners(&args).await),
        Commands::Events(args) => print_output(query::handle_events(&args).await),
        Commands::Logs(args) => print_output(query::handle_logs(&args).await),
        Commands::Start(args) => print_output(handle_action(&args, HandlerAction::Start).await),
        Commands::Stop(args) => print_output(handle_action(&args, HandlerAction::Stop).await),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

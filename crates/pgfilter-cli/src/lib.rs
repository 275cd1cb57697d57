mod cli;
mod commands;
mod config;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::ById(args) => commands::by_id(args).await,
        cli::Command::All(args) => commands::all(args).await,
        cli::Command::Filter(args) => commands::filter(args).await,
        cli::Command::Sql(args) => commands::sql(args),
        cli::Command::Demo(args) => commands::demo(args).await,
    }
}

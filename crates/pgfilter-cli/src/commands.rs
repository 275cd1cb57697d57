use crate::cli::{ByIdArgs, ConnectArgs, FilterArgs, SqlArgs};
use crate::config::Settings;
use anyhow::Context;
use pgfilter::array::TypeRegistry;
use pgfilter::{Account, AccountDao, AccountFilter, SqlLog, predicate};
use tracing::Level;

struct Session {
    client: tokio_postgres::Client,
    log: SqlLog,
}

impl Session {
    async fn open(args: &ConnectArgs) -> anyhow::Result<Self> {
        init_logging(args.verbose)?;
        let settings = Settings::resolve(args)?;
        tracing::debug!(max_sql_length = ?settings.max_sql_length, "resolved settings");

        let client = pgfilter::connect(&settings.database_url)
            .await
            .context("failed to connect to database")?;
        let log = match settings.max_sql_length {
            Some(len) => SqlLog::new().max_sql_length(len),
            None => SqlLog::new(),
        };
        Ok(Self { client, log })
    }

    fn dao(&self) -> AccountDao<'_, tokio_postgres::Client> {
        AccountDao::new(&self.client).with_log(self.log.clone())
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")
}

/// The filter the demo runs: `{Jane, John}`, active, `{red, blue, green}`.
pub fn demo_filter() -> AccountFilter {
    AccountFilter::new()
        .names(["Jane", "John"])
        .active(true)
        .fav_colors(["red", "blue", "green"])
}

fn print_accounts(title: &str, accounts: &[Account]) {
    println!("--------\n{title}");
    for account in accounts {
        println!("{account}\n");
    }
}

async fn print_by_id(session: &Session, id: i64) -> anyhow::Result<()> {
    let account = session
        .dao()
        .select_by_id(id)
        .await
        .with_context(|| format!("query by id {id} failed"))?
        .with_context(|| format!("account {id} not found"))?;
    println!("--------\nQuery by ID\n{account}");
    Ok(())
}

async fn print_all(session: &Session) -> anyhow::Result<()> {
    let accounts = session.dao().select_all().await.context("query all failed")?;
    print_accounts("Query All", &accounts);
    Ok(())
}

async fn print_filtered(session: &Session, filter: &AccountFilter) -> anyhow::Result<()> {
    let accounts = session
        .dao()
        .select_by_filter(filter)
        .await
        .context("filter query failed")?;
    print_accounts("Query Filter", &accounts);
    Ok(())
}

pub async fn by_id(args: ByIdArgs) -> anyhow::Result<()> {
    let session = Session::open(&args.connect).await?;
    print_by_id(&session, args.id).await
}

pub async fn all(args: ConnectArgs) -> anyhow::Result<()> {
    let session = Session::open(&args).await?;
    print_all(&session).await
}

pub async fn filter(args: FilterArgs) -> anyhow::Result<()> {
    let session = Session::open(&args.connect).await?;
    print_filtered(&session, &args.filter).await
}

pub async fn demo(args: ConnectArgs) -> anyhow::Result<()> {
    let session = Session::open(&args).await?;
    print_by_id(&session, 1).await?;
    print_all(&session).await?;
    print_filtered(&session, &demo_filter()).await
}

/// Render the dynamic statement and its arguments without connecting.
pub fn render_sql(filter: &AccountFilter) -> anyhow::Result<String> {
    let registry = TypeRegistry::standard();
    let result = predicate::build(filter);

    let mut args = String::new();
    for (i, argument) in result.arguments().iter().enumerate() {
        let literal = argument
            .to_literal(&registry)
            .with_context(|| format!("failed to render argument ${}", i + 1))?;
        args.push_str(&format!("${} = {literal}\n", i + 1));
    }

    let query = AccountDao::<tokio_postgres::Client>::filter_query(filter);
    Ok(format!(
        "Dynamic Query SQL:\n{}\n\nDynamic Query Args:\n{args}",
        query.sql()
    ))
}

pub fn sql(args: SqlArgs) -> anyhow::Result<()> {
    print!("{}", render_sql(&args.filter)?);
    Ok(())
}

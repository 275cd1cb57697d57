use pgfilter::AccountFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    ById,
    All,
    Filter,
    Sql,
    Demo,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    ById(ByIdArgs),
    All(ConnectArgs),
    Filter(FilterArgs),
    Sql(SqlArgs),
    Demo(ConnectArgs),
}

/// Where to find the database. `config: None` means "pgfilter.toml if present".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectArgs {
    pub config: Option<PathBuf>,
    pub database: Option<String>,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct ByIdArgs {
    pub connect: ConnectArgs,
    pub id: i64,
}

#[derive(Debug, Clone)]
pub struct FilterArgs {
    pub connect: ConnectArgs,
    pub filter: AccountFilter,
}

#[derive(Debug, Clone)]
pub struct SqlArgs {
    pub filter: AccountFilter,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    let rest = it.map(|s| s.as_str());
    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "by-id" => parse_by_id(rest),
        "all" => Ok(match parse_connect_only(rest)? {
            Some(connect) => Command::All(connect),
            None => Command::Help(HelpTopic::All),
        }),
        "demo" => Ok(match parse_connect_only(rest)? {
            Some(connect) => Command::Demo(connect),
            None => Command::Help(HelpTopic::Demo),
        }),
        "filter" => parse_filter(rest),
        "sql" => parse_sql(rest),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Handles a connection option, consuming its value from `it`.
///
/// Returns `Ok(false)` when `token` is not a connection option.
fn parse_connect_option<'a>(
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
    connect: &mut ConnectArgs,
) -> anyhow::Result<bool> {
    match token {
        "--config" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--config requires a value");
            };
            connect.config = Some(PathBuf::from(v));
        }
        _ if token.starts_with("--config=") => {
            connect.config = Some(PathBuf::from(token.trim_start_matches("--config=")));
        }
        "--database" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--database requires a value");
            };
            connect.database = Some(v.to_string());
        }
        _ if token.starts_with("--database=") => {
            connect.database = Some(token.trim_start_matches("--database=").to_string());
        }
        "-v" | "--verbose" => connect.verbose = true,
        _ => return Ok(false),
    }
    Ok(true)
}

/// Handles a filter option. Returns `Ok(false)` when `token` is not one.
fn parse_filter_option<'a>(
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
    filter: &mut AccountFilter,
) -> anyhow::Result<bool> {
    match token {
        "--name" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--name requires a value");
            };
            filter.names.push(v.to_string());
        }
        _ if token.starts_with("--name=") => {
            filter.names.push(token.trim_start_matches("--name=").to_string());
        }
        "--active" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--active requires a value");
            };
            filter.active = Some(parse_bool(v)?);
        }
        _ if token.starts_with("--active=") => {
            filter.active = Some(parse_bool(token.trim_start_matches("--active="))?);
        }
        "--color" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--color requires a value");
            };
            filter.fav_colors.push(v.to_string());
        }
        _ if token.starts_with("--color=") => {
            filter.fav_colors.push(token.trim_start_matches("--color=").to_string());
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_bool(v: &str) -> anyhow::Result<bool> {
    match v {
        "true" | "t" | "yes" | "1" => Ok(true),
        "false" | "f" | "no" | "0" => Ok(false),
        other => anyhow::bail!("--active expects true or false, got: {other}"),
    }
}

fn parse_by_id<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut connect = ConnectArgs::default();
    let mut id: Option<i64> = None;

    while let Some(token) = it.next() {
        if parse_connect_option(token, &mut it, &mut connect)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::ById)),
            other if other.starts_with('-') && other.parse::<i64>().is_err() => {
                anyhow::bail!("unknown argument: {other}")
            }
            other if id.is_none() => {
                id = Some(
                    other
                        .parse()
                        .map_err(|_| anyhow::anyhow!("invalid account id: {other}"))?,
                );
            }
            other => anyhow::bail!("unexpected argument: {other}"),
        }
    }

    let Some(id) = id else {
        anyhow::bail!("missing account id: expected `pgfilter by-id <ID>`");
    };
    Ok(Command::ById(ByIdArgs { connect, id }))
}

/// Commands that only take connection options. `None` means help was asked for.
fn parse_connect_only<'a>(
    mut it: impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<ConnectArgs>> {
    let mut connect = ConnectArgs::default();

    while let Some(token) = it.next() {
        if parse_connect_option(token, &mut it, &mut connect)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(None),
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Some(connect))
}

fn parse_filter<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut connect = ConnectArgs::default();
    let mut filter = AccountFilter::new();

    while let Some(token) = it.next() {
        if parse_connect_option(token, &mut it, &mut connect)?
            || parse_filter_option(token, &mut it, &mut filter)?
        {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Filter)),
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Filter(FilterArgs { connect, filter }))
}

fn parse_sql<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut filter = AccountFilter::new();

    while let Some(token) = it.next() {
        if parse_filter_option(token, &mut it, &mut filter)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Sql)),
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Sql(SqlArgs { filter }))
}

const CONNECT_OPTIONS: &str = "\
CONNECTION OPTIONS:
  --config <FILE>       Config file path (default: pgfilter.toml, if present)
  --database <URL>      Override database.url from config (fallback: DATABASE_URL)
  -v, --verbose         Log SQL statements to stderr
  -h, --help            Print help";

const FILTER_OPTIONS: &str = "\
FILTER OPTIONS:
  --name <NAME>         Match accounts with this name (repeatable)
  --active <BOOL>       Match the active flag (true or false)
  --color <COLOR>       Match this favorite color (repeatable)";

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
pgfilter - query the accounts table with dynamic filters

USAGE:
  pgfilter <COMMAND> [OPTIONS]

COMMANDS:
  by-id         Fetch one account by id
  all           Fetch all accounts ordered by id
  filter        Fetch accounts matching the given filters
  sql           Print the filter statement and its arguments (no connection)
  demo          Run by-id 1, all, and the Jane/John filter

Run `pgfilter <command> --help` for more."
            );
        }
        HelpTopic::ById => {
            println!("USAGE:\n  pgfilter by-id <ID> [OPTIONS]\n\n{CONNECT_OPTIONS}");
        }
        HelpTopic::All => {
            println!("USAGE:\n  pgfilter all [OPTIONS]\n\n{CONNECT_OPTIONS}");
        }
        HelpTopic::Filter => {
            println!(
                "USAGE:\n  pgfilter filter [OPTIONS]\n\n{FILTER_OPTIONS}\n\n{CONNECT_OPTIONS}\n\n\
                 With no filter options every account is returned."
            );
        }
        HelpTopic::Sql => {
            println!(
                "USAGE:\n  pgfilter sql [OPTIONS]\n\n{FILTER_OPTIONS}\n  -h, --help            Print help"
            );
        }
        HelpTopic::Demo => {
            println!(
                "USAGE:\n  pgfilter demo [OPTIONS]\n\n{CONNECT_OPTIONS}\n\n\
                 Runs: by-id 1, all, and filter --name Jane --name John --active true \
                 --color red --color blue --color green"
            );
        }
    }
}

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use vgsales::analysis::MatchMode;
use vgsales::query::CriteriaParser;
use vgsales::{Config, FilterCriteria, Result, SalesEngine};

/// Video game sales analytics over a CSV dataset
#[derive(Debug, Parser)]
#[command(name = "vgsales", version, about)]
struct Cli {
    /// Sales dataset (CSV with a header row)
    #[arg(long, env = "VGSALES_DATA", default_value = "gamesales.csv", global = true)]
    data: PathBuf,

    /// Match vocabulary as whole words in free-text queries
    #[arg(long, global = true)]
    token_match: bool,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Default, Args)]
struct FilterArgs {
    #[arg(long = "year", global = true)]
    years: Vec<String>,
    #[arg(long = "genre", global = true)]
    genres: Vec<String>,
    #[arg(long = "platform", global = true)]
    platforms: Vec<String>,
    #[arg(long = "publisher", global = true)]
    publishers: Vec<String>,
    /// NA, EU, JP or Other
    #[arg(long = "region", global = true)]
    regions: Vec<String>,
    /// Case-insensitive part of the game name
    #[arg(long, global = true)]
    name: Option<String>,
}

impl FilterArgs {
    fn to_criteria(&self) -> FilterCriteria {
        let pairs = self
            .years
            .iter()
            .map(|v| ("year", v.as_str()))
            .chain(self.genres.iter().map(|v| ("genre", v.as_str())))
            .chain(self.platforms.iter().map(|v| ("platform", v.as_str())))
            .chain(self.publishers.iter().map(|v| ("publisher", v.as_str())))
            .chain(self.regions.iter().map(|v| ("region", v.as_str())))
            .chain(self.name.iter().map(|v| ("name", v.as_str())));
        CriteriaParser::new().from_pairs(pairs)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Distinct filter values present in the dataset
    Options,
    /// Total global sales and distinct game count
    Kpi,
    /// Ten best sellers under the selected sales figure
    TopGames,
    /// Sales per region
    RegionSales,
    /// Sales per year for each selected column
    YearlySales,
    /// Global sales per genre
    GenreSales,
    /// Ten best-selling publishers
    PublisherSales,
    /// Derive filters from free text and summarise the matches
    NlFilter {
        query: String,
    },
    /// Export the filtered rows as CSV
    ReportCsv {
        /// JSON body with a "filters" object; replaces the filter flags
        #[arg(long)]
        body: Option<PathBuf>,
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("vgsales: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::default().with_dataset_path(&cli.data);
    if cli.token_match {
        config.extractor.match_mode = MatchMode::Token;
    }

    let engine = SalesEngine::open(config)?;
    let criteria = cli.filters.to_criteria();

    match cli.command {
        Command::Options => print_json(&engine.options()),
        Command::Kpi => print_json(&engine.kpi(&criteria)),
        Command::TopGames => print_json(&engine.top_games(&criteria)),
        Command::RegionSales => print_json(&engine.region_sales(&criteria)),
        Command::YearlySales => print_json(&engine.yearly_sales(&criteria)),
        Command::GenreSales => print_json(&engine.genre_sales(&criteria)),
        Command::PublisherSales => print_json(&engine.publisher_sales(&criteria)),
        Command::NlFilter { query } => print_json(&engine.nl_filter(&query)),
        Command::ReportCsv { body, out } => {
            let criteria = match body {
                Some(path) => CriteriaParser::new().from_json_str(&std::fs::read_to_string(path)?)?,
                None => criteria,
            };
            match out {
                Some(path) => {
                    let rows = engine.report_csv(&criteria, BufWriter::new(File::create(&path)?))?;
                    eprintln!("Wrote {} rows to {}", rows, path.display());
                }
                None => {
                    engine.report_csv(&criteria, io::stdout().lock())?;
                }
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgsales::Region;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_flags_become_criteria() {
        let cli = Cli::parse_from([
            "vgsales", "--year", "2005", "--region", "jp", "--genre", "Action", "top-games",
        ]);
        let criteria = cli.filters.to_criteria();
        assert_eq!(criteria.years.to_vec(), vec![2005]);
        assert_eq!(criteria.regions.to_vec(), vec![Region::JP]);
        assert!(matches!(cli.command, Command::TopGames));
    }

    #[test]
    fn flags_after_subcommand_are_accepted() {
        let cli = Cli::parse_from(["vgsales", "kpi", "--publisher", "Nintendo", "--name", "mario"]);
        let criteria = cli.filters.to_criteria();
        assert_eq!(criteria.publishers.to_vec(), vec!["Nintendo".to_string()]);
        assert_eq!(criteria.name.as_deref(), Some("mario"));
    }
}

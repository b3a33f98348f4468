use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use slidecv::config::{manager::ENV_PREFIX, ConfigManager};
use slidecv::data::{reduce_mem_usage, shuffle_rows, take_split, CsvConnector};
use slidecv::logging::{init_default_logger, init_logger};
use slidecv::progress::{ConsoleProgressCallback, ProgressBar};

#[derive(Debug, Parser)]
#[command(name = "slidecv", about = "Walk-forward train/test splits over a CSV time series")]
struct Args {
    /// CSV file to split
    #[arg(long)]
    csv: PathBuf,

    /// Time column (overrides the config file)
    #[arg(long)]
    column: Option<String>,

    #[arg(long)]
    n_splits: Option<usize>,

    #[arg(long)]
    train_ratio: Option<f64>,

    /// TOML config; SLIDECV_<SECTION>__<KEY> env vars override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON logging config
    #[arg(long)]
    log_config: Option<PathBuf>,

    /// Downcast numeric columns before splitting
    #[arg(long)]
    reduce: bool,

    /// Shuffle rows first; the splits must not change
    #[arg(long)]
    shuffle: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let manager = ConfigManager::new();
    if let Some(path) = &args.config {
        manager
            .load_layered(path, ENV_PREFIX)
            .with_context(|| format!("loading config {}", path.display()))?;
    }
    manager.update(|c| {
        if let Some(column) = &args.column {
            c.split.timeseries_column = column.clone();
        }
        if let Some(n_splits) = args.n_splits {
            c.split.n_splits = n_splits;
        }
        if let Some(train_ratio) = args.train_ratio {
            c.split.train_ratio = train_ratio;
        }
        if args.log_config.is_some() {
            c.logging.config_path = args.log_config.clone();
        }
        c.data.reduce_memory |= args.reduce;
    })?;
    let config = manager.get()?;

    match &config.logging.config_path {
        Some(path) => {
            init_logger(path).with_context(|| format!("initializing logging from {}", path.display()))?;
        }
        None => init_default_logger(),
    }

    let mut df = CsvConnector::load_and_validate(
        &args.csv,
        &config.split.timeseries_column,
        Some(config.data.min_rows),
    )?;
    if config.data.reduce_memory {
        let reduction = reduce_mem_usage(&mut df)?;
        if !reduction.na_columns.is_empty() {
            log::warn!("Filled missing values in {:?}", reduction.na_columns);
        }
    }
    if args.shuffle {
        df = shuffle_rows(&df, args.seed)?;
    }

    let splitter = config.split.build_splitter()?;
    println!(
        "data size: {}, n_splits: {}, train_ratio: {}",
        df.height(),
        splitter.n_splits(),
        splitter.config().train_ratio
    );

    let splits = splitter.split_all(&df)?;

    let mut bar = ProgressBar::new(Some(splits.len()), ConsoleProgressCallback::new());
    let mut report = bar.decorate(|split: &slidecv::DataSplit<slidecv::data::ColumnValue>| {
        take_split(&df, split).map(|frames| {
            format!(
                "fold {}: train {} rows [{} ..= {}], test {} rows [{} ..= {}]",
                frames.fold_num,
                frames.train.height(),
                split.train_window.begin,
                split.train_window.end,
                frames.test.height(),
                split.test_window.begin,
                split.test_window.end,
            )
        })
    });
    let lines = splits.iter().map(&mut report).collect::<Result<Vec<_>, _>>()?;
    drop(report);
    bar.finish();

    for line in lines {
        println!("{}", line);
    }

    Ok(())
}

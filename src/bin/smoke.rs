//! filebacked smoke harness
//!
//! Runs list, map and set workloads against real scratch files and logs
//! timings and file sizes.

use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use filebacked::{Collection, Config, FileBackedList, FileBackedMap, FileBackedSet, Result};
use rand::Rng;
use tracing_subscriber::{fmt, EnvFilter};

/// filebacked smoke harness
#[derive(Parser, Debug)]
#[command(name = "filebacked-smoke")]
#[command(about = "Exercise file-backed collections with a synthetic workload")]
#[command(version)]
struct Args {
    /// Number of items per workload
    #[arg(short = 'n', long, default_value = "100000")]
    items: usize,

    /// Directory for scratch files (defaults to the OS temp directory)
    #[arg(short, long)]
    scratch_dir: Option<String>,

    /// Workload to run
    #[arg(short, long, value_enum, default_value = "all")]
    workload: Workload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Workload {
    List,
    Map,
    Set,
    All,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,filebacked=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("filebacked smoke harness v{}", filebacked::VERSION);
    tracing::info!("Items per workload: {}", args.items);

    let mut builder = Config::builder();
    if let Some(dir) = &args.scratch_dir {
        tracing::info!("Scratch directory: {}", dir);
        builder = builder.scratch_dir(dir);
    }
    let config = builder.build();

    let workloads: &[Workload] = match args.workload {
        Workload::All => &[Workload::List, Workload::Map, Workload::Set],
        Workload::List => &[Workload::List],
        Workload::Map => &[Workload::Map],
        Workload::Set => &[Workload::Set],
    };

    for workload in workloads {
        let start = Instant::now();
        let result = match workload {
            Workload::List => run_list(&config, args.items),
            Workload::Map => run_map(&config, args.items),
            Workload::Set => run_set(&config, args.items),
            Workload::All => Ok(()),
        };

        if let Err(e) = result {
            tracing::error!("{:?} workload failed: {}", workload, e);
            return ExitCode::FAILURE;
        }
        tracing::info!("{:?} workload took {:?}", workload, start.elapsed());
    }

    ExitCode::SUCCESS
}

/// Add, clear, refill, overwrite, remove, store an absent value, compact
fn run_list(config: &Config, items: usize) -> Result<()> {
    let mut list: FileBackedList<String> = FileBackedList::with_config(config.clone());

    fill(&mut list, (0..items).map(|i| format!("item {}", i)))?;
    tracing::info!("after add: len {}", list.len());

    list.clear()?;
    tracing::info!("after clear: len {}", list.len());

    for i in 0..items {
        list.push(format!("item {}", i))?;
        list.push(i.to_string())?;
    }

    for i in 0..items / 3 {
        list.set(i, format!("xxxxxx{}", i))?;
    }
    for i in 0..items / 3 {
        if list.get(i)? != Some(format!("xxxxxx{}", i)) {
            tracing::error!("slot {} lost its value after set", i);
        }
    }
    tracing::info!("tested setting items");

    for i in 0..items / 3 {
        list.remove(i)?;
    }
    tracing::info!("after remove: len {}", list.len());

    if list.len() > 1 {
        list.set(1, None)?;
        tracing::info!("absent value in slot 1 reads back as {:?}", list.get(1)?);
    }

    let before = list.file_size()?;
    list.compact()?;
    tracing::info!(
        "compaction: {} -> {} bytes, {} orphan bytes left",
        before,
        list.file_size()?,
        list.orphan_bytes()?
    );

    let mut arrays: FileBackedList<Vec<Option<i64>>> = FileBackedList::with_config(config.clone());
    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        arrays.push((0..10).map(|_| Some(rng.gen::<i64>())).collect::<Vec<_>>())?;
    }
    arrays.push(vec![None; 5])?;
    for value in arrays.iter() {
        tracing::debug!("array: {:?}", value?);
    }

    arrays.close()?;
    list.close()
}

/// Insert, overwrite, insert suffixed keys, remove half of them, use the None key
fn run_map(config: &Config, items: usize) -> Result<()> {
    let mut map: FileBackedMap<String, String> = FileBackedMap::with_config(config.clone());

    for i in 0..items {
        map.insert(i.to_string(), (i as u64 * 9_029_349).to_string())?;
    }
    for i in 0..items {
        map.insert(i.to_string(), (i * 100).to_string())?;
    }
    for i in 0..items {
        map.insert(format!("{}x", i), (i * 100).to_string())?;
    }
    for i in 0..items / 2 {
        map.remove(&format!("{}x", i))?;
    }

    tracing::info!("value of 10x: {:?}", map.get(&"10x".to_string())?);
    tracing::info!("value of 100: {:?}", map.get(&"100".to_string())?);

    map.insert(None, "test null value".to_string())?;
    tracing::info!("None key value: {:?}", map.get(None)?);
    tracing::info!(
        "map len {}, {} orphaned slots, {} bytes",
        map.len(),
        map.orphaned_slots(),
        map.file_size()?
    );

    map.compact()?;
    tracing::info!("after compaction: {} bytes", map.file_size()?);

    map.close()
}

/// Insert random numbers; duplicates are refused
fn run_set(config: &Config, items: usize) -> Result<()> {
    let mut set: FileBackedSet<String> = FileBackedSet::with_config(config.clone());
    let mut rng = rand::thread_rng();

    let values: Vec<String> = (0..items)
        .map(|_| rng.gen_range(0..50_000).to_string())
        .collect();
    fill(&mut set, values)?;
    tracing::info!("set len after {} random inserts: {}", items, set.len());

    set.close()
}

/// Add every value through the shared collection interface
fn fill<C, I>(collection: &mut C, values: I) -> Result<usize>
where
    C: Collection<String>,
    I: IntoIterator<Item = String>,
{
    let mut added = 0;
    for value in values {
        if collection.add(Some(value))? {
            added += 1;
        }
    }
    Ok(added)
}

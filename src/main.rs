use clap::Parser;
use linked_list::{LinkedList, ListError};

/// Builds a list from the given values, applies the requested edits and
/// prints the result.
#[derive(Parser, Debug)]
#[command(about = "Exercise a singly-linked list from the command line")]
struct CmdOptions {
    /// Values to append, in order
    values: Vec<i64>,
    /// Values to prepend, applied in order after the list is built
    #[arg(long)]
    prepend: Vec<i64>,
    /// Insert a value at a position, written as INDEX:VALUE
    #[arg(long, value_parser = parse_insert)]
    insert: Vec<(usize, i64)>,
    /// Remove occurrences of this value
    #[arg(long)]
    remove: Option<i64>,
    /// How many occurrences --remove may take out (all of them if omitted)
    #[arg(long, requires = "remove")]
    count: Option<usize>,
}

fn parse_insert(arg: &str) -> Result<(usize, i64), String> {
    let (index, value) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected INDEX:VALUE, got {}", arg))?;
    let index = index.parse().map_err(|e| format!("bad index {}: {}", index, e))?;
    let value = value.parse().map_err(|e| format!("bad value {}: {}", value, e))?;
    Ok((index, value))
}

fn run(options: CmdOptions) -> Result<LinkedList<i64>, ListError> {
    let mut list: LinkedList<i64> = options.values.into_iter().collect();
    log::debug!("built {}", list);

    for value in options.prepend {
        list.prepend(value);
    }
    for (index, value) in options.insert {
        list.insert(index, value)?;
        log::debug!("inserted {} at {}: {}", value, index, list);
    }
    if let Some(value) = options.remove {
        match options.count {
            Some(count) => list.remove_value(&value, count),
            None => list.remove_all(&value),
        };
    }
    Ok(list)
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let options = CmdOptions::parse();
    let list = match run(options) {
        Ok(list) => list,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    println!("{}", list);
    println!("size: {}", list.get_size());
    match (list.get_head(), list.get_tail()) {
        (Ok(head), Ok(tail)) => println!("head: {}, tail: {}", head, tail),
        _ => println!("list is empty"),
    }
}

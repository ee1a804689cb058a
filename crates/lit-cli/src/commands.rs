use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use lit_sdk::{CheckoutState, InitStatus, Lit, LogEntry, ObjectId, RefStore, TreeSource};
use lit_store::Blob;
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(args, format),
        Command::HashObject(args) => cmd_hash_object(args, format),
        Command::CatFile(args) => cmd_cat_file(args, format),
        Command::Add(args) => cmd_add(args, format),
        Command::WriteTree(args) => cmd_write_tree(args, format),
        Command::LsTree(args) => cmd_ls_tree(args, format),
        Command::CommitTree(args) => cmd_commit_tree(args, format),
        Command::Commit(args) => cmd_commit(args, format),
        Command::Log(args) => cmd_log(args, format),
        Command::Checkout(args) => cmd_checkout(args, format),
        Command::Status(_) => cmd_status(format),
    }
}

fn current_dir() -> anyhow::Result<PathBuf> {
    std::env::current_dir().context("cannot read the current directory")
}

fn open_repo() -> anyhow::Result<Lit> {
    Ok(Lit::discover(&current_dir()?)?)
}

fn parse_id(hex: &str) -> anyhow::Result<ObjectId> {
    ObjectId::from_hex(hex).with_context(|| format!("invalid object id: {hex}"))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_init(args: InitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let root = match args.path {
        Some(path) => path,
        None => current_dir()?,
    };
    let (lit, status) = Lit::init(&root)?;
    let meta = lit.handle().meta_dir().display().to_string();
    match format {
        OutputFormat::Json => print_json(&json!({
            "root": lit.handle().root(),
            "reinitialized": status == InitStatus::Reinitialized,
        })),
        OutputFormat::Text => {
            match status {
                InitStatus::Created => {
                    println!("{} Initialized empty lit repository in {}", "✓".green().bold(), meta.bold())
                }
                InitStatus::Reinitialized => {
                    println!("Reinitialized existing lit repository in {}", meta.bold())
                }
            }
            Ok(())
        }
    }
}

fn cmd_hash_object(args: HashObjectArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = if args.write {
        open_repo()?.hash_object(&args.file, true)?
    } else {
        let data = fs::read(&args.file)
            .with_context(|| format!("cannot read {}", args.file.display()))?;
        Blob::id_of(&data)
    };
    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "written": args.write })),
        OutputFormat::Text => {
            println!("{id}");
            Ok(())
        }
    }
}

fn cmd_cat_file(args: CatFileArgs, format: OutputFormat) -> anyhow::Result<()> {
    let lit = open_repo()?;
    let id = parse_id(&args.object)?;
    let object = lit.cat_file(&id)?;
    if format == OutputFormat::Json {
        let mut value = json!({ "id": id, "type": object.kind, "size": object.size });
        if args.pretty {
            value["content"] = json!(String::from_utf8_lossy(&object.data));
        }
        return print_json(&value);
    }
    if args.pretty {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&object.data)?;
        stdout.flush()?;
    } else if args.kind {
        println!("{}", object.kind);
    } else {
        println!("{}", object.size);
    }
    Ok(())
}

fn cmd_add(args: AddArgs, format: OutputFormat) -> anyhow::Result<()> {
    let lit = open_repo()?;
    let cwd = current_dir()?;
    let mut staged = Vec::new();
    for path in &args.paths {
        staged.extend(lit.add(&cwd.join(path))?);
    }
    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = staged.iter().map(|(p, id)| json!({ "path": p, "id": id })).collect();
            print_json(&entries)
        }
        OutputFormat::Text => {
            for (path, _) in &staged {
                println!("  {} {}", "staged:".green(), path);
            }
            Ok(())
        }
    }
}

fn cmd_write_tree(args: WriteTreeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let source = if args.workdir { TreeSource::Workdir } else { TreeSource::Index };
    let id = open_repo()?.write_tree(source)?;
    match format {
        OutputFormat::Json => print_json(&json!({ "tree": id })),
        OutputFormat::Text => {
            println!("{id}");
            Ok(())
        }
    }
}

fn cmd_ls_tree(args: LsTreeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let tree = open_repo()?.ls_tree(&parse_id(&args.tree)?)?;
    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = tree
                .entries
                .iter()
                .map(|e| json!({ "mode": e.mode.as_str(), "type": e.kind(), "id": e.object_id, "name": e.name }))
                .collect();
            print_json(&entries)
        }
        OutputFormat::Text => {
            for entry in &tree.entries {
                println!("{}", entry.to_line());
            }
            Ok(())
        }
    }
}

fn print_commit_line(lit: &Lit, id: &ObjectId, message: &str, format: OutputFormat) -> anyhow::Result<()> {
    let head = lit.refs().head()?;
    let branch = head.as_ref().and_then(|h| h.branch_name()).unwrap_or("HEAD");
    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "branch": branch })),
        OutputFormat::Text => {
            let summary = message.lines().next().unwrap_or("");
            println!("[{} {}] {}", branch.yellow(), id.short_hex().dimmed(), summary);
            Ok(())
        }
    }
}

fn cmd_commit_tree(args: CommitTreeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let lit = open_repo()?;
    let id = lit.commit_tree(parse_id(&args.tree)?, &args.message)?;
    print_commit_line(&lit, &id, &args.message, format)
}

fn cmd_commit(args: CommitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let lit = open_repo()?;
    let id = lit.commit(&args.message)?;
    print_commit_line(&lit, &id, &args.message, format)
}

fn format_date(entry: &LogEntry) -> String {
    match entry.commit.timestamp() {
        Some(ts) => ts.format("%a %b %e %H:%M:%S %Y %z").to_string(),
        None => entry.commit.date.to_string(),
    }
}

fn cmd_log(args: LogArgs, format: OutputFormat) -> anyhow::Result<()> {
    let entries = open_repo()?.log(args.limit)?;
    if format == OutputFormat::Json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No commits yet.");
        return Ok(());
    }
    for entry in &entries {
        if args.oneline {
            println!("{} {}", entry.id.short_hex().yellow(), entry.commit.summary());
            continue;
        }
        println!("{} {}", "commit".yellow(), entry.id.to_hex().yellow());
        println!("Author: {}", entry.commit.author);
        println!("Date:   {}", format_date(entry));
        println!();
        for line in entry.commit.message.lines() {
            println!("    {line}");
        }
        println!();
    }
    Ok(())
}

fn cmd_checkout(args: CheckoutArgs, format: OutputFormat) -> anyhow::Result<()> {
    let outcome = open_repo()?.checkout(&args.revision)?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "previous": outcome.previous,
            "target": outcome.target,
            "tree": outcome.tree,
            "files": outcome.stats.files,
            "dirs": outcome.stats.dirs,
        })),
        OutputFormat::Text => {
            println!(
                "{} HEAD is now at {} ({} files, {} directories)",
                "✓".green().bold(),
                outcome.target.short_hex().yellow(),
                outcome.stats.files,
                outcome.stats.dirs
            );
            Ok(())
        }
    }
}

fn cmd_status(format: OutputFormat) -> anyhow::Result<()> {
    let status = open_repo()?.status()?;
    if format == OutputFormat::Json {
        return print_json(&status);
    }
    match (&status.branch, status.report.head_commit) {
        (Some(branch), _) => println!("On branch {}", branch.yellow().bold()),
        (None, Some(id)) => println!("HEAD detached at {}", id.short_hex().yellow()),
        (None, None) => println!("HEAD is unset"),
    }
    if status.report.head_commit.is_none() {
        println!("No commits yet.");
    }
    println!("  HEAD tree:    {}", status.report.head_tree);
    println!("  index tree:   {}", status.report.index_tree);
    println!("  workdir tree: {}", status.report.workdir_tree);
    let state = match status.state {
        CheckoutState::Dirty => status.state.to_string().red().bold(),
        _ => status.state.to_string().green().bold(),
    };
    println!("Working directory: {state}");
    Ok(())
}

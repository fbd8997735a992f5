use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use difftree::DiffOutputFormat;
use difftree::areas::repository::Repository;
use difftree::artifacts::diff::change::DiffFilter;
use difftree::commands::plumbing::diff_tree::DiffTreeOptions;
use difftree::commands::plumbing::ls_tree::LsTreeOptions;
use difftree::logging;

#[derive(Parser)]
#[command(
    name = "difftree",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Show what changed between git tree snapshots",
    long_about = "Compares a commit's tree with the tree of its first parent and reports \
    every file that was inserted, deleted or modified. Unchanged directories are skipped \
    by hash without being read.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        global = true,
        value_name = "PATH",
        help = "Run as if started in <PATH> instead of the current directory"
    )]
    repository: Option<String>,
    #[arg(
        long,
        global = true,
        env = "DIFFTREE_LOG",
        value_name = "FILTER",
        help = "Log level or filter directives, e.g. debug or difftree::areas=trace"
    )]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "diff-tree",
        about = "Show the files a commit changed",
        long_about = "This command compares the tree of a commit with the tree of its first parent. \
        It requires the full 40-character commit id; abbreviated ids are rejected. \
        A root commit has nothing to compare against and prints nothing.",
        group(ArgGroup::new("format").args(["name_only", "name_status"]))
    )]
    DiffTree {
        #[arg(index = 1, help = "The full id of the commit to inspect")]
        commit: String,
        #[arg(long, help = "Show only the names of changed files")]
        name_only: bool,
        #[arg(long, help = "Show the names and status of changed files")]
        name_status: bool,
        #[arg(
            long,
            value_name = "ADM",
            value_parser = parse_diff_filter,
            help = "Select only added (A), deleted (D) or modified (M) files"
        )]
        diff_filter: Option<DiffFilter>,
        #[arg(long, help = "Do not print the commit id before the changes")]
        no_commit_id: bool,
        #[arg(long, help = "Print per-action counts after the changes")]
        summary: bool,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "This command lists the entries of a tree, or of the tree of a commit."
    )]
    LsTree {
        #[arg(short, long, help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1, help = "The full id of a tree or commit")]
        object: String,
    },
}

fn parse_diff_filter(value: &str) -> Result<DiffFilter, String> {
    DiffFilter::try_parse(value)
        .ok_or_else(|| format!("invalid filter {value:?}: expected letters among A, D, M"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref())?;

    let path = match &cli.repository {
        Some(path) => path.clone(),
        None => std::env::current_dir()?.to_string_lossy().to_string(),
    };
    let repository = Repository::new(&path, Box::new(std::io::stdout()))?;

    match &cli.command {
        Commands::DiffTree {
            commit,
            name_only,
            name_status,
            diff_filter,
            no_commit_id,
            summary,
        } => {
            let format = if *name_only {
                DiffOutputFormat::NameOnly
            } else if *name_status {
                DiffOutputFormat::NameStatus
            } else {
                DiffOutputFormat::Raw
            };
            let opts = DiffTreeOptions::new(format, *diff_filter, *no_commit_id, *summary);

            repository.diff_tree(commit, &opts)?
        }
        Commands::LsTree { recursive, object } => {
            repository.ls_tree(object, &LsTreeOptions::new(*recursive))?
        }
    }

    Ok(())
}

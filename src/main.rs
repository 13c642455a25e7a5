use anyhow::Result;
use clap::Parser;
use pkgex::application::DeleteMode;
use pkgex::commands::{self, config::Config};
use std::path::PathBuf;
use std::sync::Arc;

/// pkgex - Python package explorer
///
/// List the packages installed for a Python interpreter, install or
/// uninstall packages, and delete or open package folders.
///
/// Without a subcommand an interactive session is started.
///
/// Examples:
///   pkgex                      # Interactive session
///   pkgex list --json          # Installed packages as JSON
///   pkgex --python .venv/bin/python install requests
#[derive(Parser, Debug)]
#[command(author, version = env!("PKGEX_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Python interpreter whose packages are managed (also via PKGEX_PYTHON)
    #[arg(long, env = "PKGEX_PYTHON", value_name = "PATH", global = true)]
    pub python: Option<PathBuf>,

    /// Directory holding the package folders (default: asked from the interpreter)
    #[arg(
        long = "site-packages",
        env = "PKGEX_SITE_PACKAGES",
        value_name = "PATH",
        global = true
    )]
    pub site_packages: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List installed packages
    List(ListArgs),

    /// Install a package
    Install(PackageArgs),

    /// Uninstall a package (no confirmation)
    Uninstall(PackageArgs),

    /// Delete a package's folder (only if empty) or uninstall it
    ///
    /// With `--mode delete`, a folder that is not empty is left in place and
    /// the command exits with an error. A missing folder is not an error.
    Delete(DeleteArgs),

    /// Open a package's folder in the file browser
    Open(PackageArgs),

    /// Print the folder a package is installed in
    Path(PackageArgs),

    /// Start an interactive session (default)
    Shell,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Print the list as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct PackageArgs {
    /// Package name as shown by `pkgex list`
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Package name as shown by `pkgex list`
    #[arg(value_name = "NAME")]
    pub name: String,

    /// What to do with the package
    #[arg(long, value_enum, default_value_t = DeleteModeArg::Delete)]
    pub mode: DeleteModeArg,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteModeArg {
    /// Remove the package folder if it is empty
    Delete,
    /// Run `pip uninstall -y`
    Uninstall,
}

impl From<DeleteModeArg> for DeleteMode {
    fn from(mode: DeleteModeArg) -> Self {
        match mode {
            DeleteModeArg::Delete => DeleteMode::Folder,
            DeleteModeArg::Uninstall => DeleteMode::Uninstall,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config::new(cli.python, cli.site_packages);
    let runtime = Arc::new(pkgex::runtime::RealRuntime);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::List(args) => commands::list(runtime, &config, args.json).await?,
        Commands::Install(args) => commands::install(runtime.as_ref(), &config, &args.name).await?,
        Commands::Uninstall(args) => {
            commands::uninstall(runtime.as_ref(), &config, &args.name).await?
        }
        Commands::Delete(args) => {
            commands::delete(runtime.as_ref(), &config, &args.name, args.mode.into()).await?
        }
        Commands::Open(args) => commands::open(runtime.as_ref(), &config, &args.name).await?,
        Commands::Path(args) => commands::path(runtime.as_ref(), &config, &args.name).await?,
        Commands::Shell => commands::shell(runtime, &config).await?,
    }
    Ok(())
}

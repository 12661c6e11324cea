use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Working directory
    /// Optional. Folder whose editor session to attach to. Defaults to the
    /// current directory.
    #[clap(help = "folder the editor was started for")]
    folder: Option<PathBuf>,

    /// Profile name
    /// Optional. Section of the profile file to read settings from.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Verbose mode
    /// Optional. Print verbose messages.
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,

    /// Socket directory
    /// Optional. Overrides the directory scanned for editor sockets.
    #[clap(long, help = "directory holding editor sockets")]
    socket_dir: Option<PathBuf>,

    /// Launch mode
    /// Optional. Start a new editor for the folder instead of attaching.
    #[clap(
        short = 'l',
        long,
        help = "Start a new editor for the folder",
        default_value = "false"
    )]
    launch: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    folder: Option<PathBuf>,
    profile: String,
    verbose: bool,
    socket_dir: Option<PathBuf>,
    launch: bool,
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            folder: args.folder,
            profile: args.profile,
            verbose: args.verbose,
            socket_dir: args.socket_dir,
            launch: args.launch,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn socket_dir(&self) -> Option<&Path> {
        self.socket_dir.as_deref()
    }

    pub fn launch(&self) -> bool {
        self.launch
    }
}

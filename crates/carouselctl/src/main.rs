use carousel::protocol::{Command, SOCKET_PATH};
use clap::{Parser, Subcommand};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "carouselctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control socket of the running carousel daemon
    #[arg(short = 's', long, default_value = SOCKET_PATH)]
    socket: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Step to the next item
    Next,
    /// Step to the previous item
    Prev,
    /// Jump to an item (any integer, wrapped into range)
    #[command(name = "goto")]
    GoTo {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Report a new viewport width
    Resize { width: f32 },
    /// Begin a drag gesture (suspends autoplay)
    DragStart,
    /// Update the in-progress drag offset
    DragMove {
        #[arg(allow_negative_numbers = true)]
        offset: f32,
        #[arg(allow_negative_numbers = true, default_value_t = 0.0)]
        velocity: f32,
    },
    /// Release a drag; the daemon decides whether it commits
    DragEnd {
        #[arg(allow_negative_numbers = true)]
        offset: f32,
        /// Release velocity; defaults to the last drag-move velocity
        #[arg(allow_negative_numbers = true)]
        velocity: Option<f32>,
    },
    /// Suspend autoplay (e.g. pointer entered)
    Pause,
    /// Release one pause
    Resume,
    /// Print the current frame
    Status,
    /// Stop autoplay and shut the daemon down
    Dispose,
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Next => Command::Next,
            Commands::Prev => Command::Prev,
            Commands::GoTo { index } => Command::GoTo(index),
            Commands::Resize { width } => Command::Resize(width),
            Commands::DragStart => Command::DragStart,
            Commands::DragMove { offset, velocity } => Command::DragMove {
                offset_x: offset,
                velocity_x: velocity,
            },
            Commands::DragEnd { offset, velocity } => Command::DragEnd {
                offset_x: offset,
                velocity_x: velocity,
            },
            Commands::Pause => Command::Pause,
            Commands::Resume => Command::Resume,
            Commands::Status => Command::Status,
            Commands::Dispose => Command::Dispose,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let command = Command::from(cli.command);
    let reply = send_command(&cli.socket, &command)?;

    if let Some(message) = reply.strip_prefix("error: ") {
        anyhow::bail!("carousel rejected '{}': {}", command, message.trim_end());
    }
    if command == Command::Status {
        print!("{}", reply);
    }
    Ok(())
}

/// Sends one line and collects the reply up to its terminating empty line.
fn send_command(socket: &Path, command: &Command) -> anyhow::Result<String> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to carousel daemon at {}: {}. Is carousel running?",
            socket.display(),
            e
        )
    })?;

    writeln!(stream, "{}", command)?;
    log::debug!("Sent '{}'", command);

    let mut reply = String::new();
    for line in BufReader::new(stream).lines() {
        let line = line?;
        if line.is_empty() {
            break;
        }
        reply.push_str(&line);
        reply.push('\n');
    }
    Ok(reply)
}

use duelgrid::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Input {
    Play(usize),
    Reset,
    Cancel,
    Quit,
    Chat(String),
    Nothing,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" => Input::Nothing,
        "/reset" => Input::Reset,
        "/cancel" => Input::Cancel,
        "/quit" => Input::Quit,
        _ => match line.parse::<usize>() {
            Ok(cell) => Input::Play(cell),
            Err(_) => Input::Chat(line.to_string()),
        },
    }
}

enum Mode {
    Host { bind_addr: String },
    Join { remote: String },
}

fn parse_args(args: &[String]) -> Option<(Mode, String)> {
    match args {
        [cmd, name] if cmd == "host" => Some((
            Mode::Host { bind_addr: SessionConfig::default().bind_addr },
            name.clone(),
        )),
        [cmd, name, addr] if cmd == "host" => {
            Some((Mode::Host { bind_addr: addr.clone() }, name.clone()))
        }
        [cmd, name, remote] if cmd == "join" => {
            Some((Mode::Join { remote: remote.clone() }, name.clone()))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Draws the board as an n×n grid. Empty cells show their index.
fn render_board(snapshot: &GameSnapshot) -> String {
    let n = (snapshot.board.len() as f64).sqrt() as usize;
    let width = (snapshot.board.len().saturating_sub(1)).to_string().len();
    let rows: Vec<String> = snapshot
        .board
        .chunks(n.max(1))
        .enumerate()
        .map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(|(c, cell)| match cell.mark() {
                    Some(mark) => format!("{:>width$}", mark.to_string()),
                    None => format!("{:>width$}", r * n + c),
                })
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect();
    let rule = "-".repeat(rows.first().map_or(0, |r| r.len()));
    rows.join(&format!("\n{rule}\n"))
}

fn status_line(snapshot: &GameSnapshot) -> String {
    match (snapshot.status, snapshot.winner) {
        (GameStatus::Won, Some(winner)) => format!("{winner} wins!"),
        (GameStatus::Draw, _) => "draw".to_string(),
        _ => format!("{} to move", snapshot.current_player),
    }
}

fn print_notice(notice: &Notice) {
    match notice {
        Notice::StateChanged(state) => println!("[{state}]"),
        Notice::EndpointReady { id } => {
            println!("hosting at {id}; have your opponent run: terminal-duel join <name> {id}")
        }
        Notice::Connected { mark } => println!("connected, you are {mark}"),
        Notice::OpponentJoined { username } => println!("opponent: {username}"),
        Notice::SnapshotUpdated(snapshot) => {
            println!("{}\n{}", render_board(snapshot), status_line(snapshot))
        }
        Notice::ChatAppended(msg) => println!("<{}> {}", msg.username, msg.text),
        Notice::ConnectionFailed { reason } => println!("connection failed: {reason}"),
        Notice::Disconnected { reason } => println!("disconnected: {reason}"),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((mode, name)) = parse_args(&args) else {
        eprintln!("usage: terminal-duel host <name> [bind_addr]");
        eprintln!("       terminal-duel join <name> <host:port>");
        std::process::exit(2);
    };

    let (peer, mut notices) = Peer::spawn();
    match mode {
        Mode::Host { bind_addr } => {
            let config = SessionConfig { bind_addr, ..SessionConfig::default() };
            peer.host(&name, config).await?;
        }
        Mode::Join { remote } => {
            peer.join(&name, &remote, SessionConfig::default()).await?;
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            notice = notices.recv() => match notice {
                Some(notice) => print_notice(&notice),
                None => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let result = match parse_input(&line) {
                    Input::Play(cell) => peer.play(cell).await,
                    Input::Reset => peer.reset().await,
                    Input::Cancel => peer.cancel().await,
                    Input::Chat(text) => peer.chat(&text).await,
                    Input::Quit => break,
                    Input::Nothing => Ok(()),
                };
                if let Err(e) = result {
                    println!("! {e}");
                }
            }
        }
    }

    tracing::debug!("shutting down");
    peer.shutdown().await?;
    Ok(())
}

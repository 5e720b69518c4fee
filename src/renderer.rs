//! Polling renderer: fetch the snapshot, classify each record, hand the
//! resulting board to a sink.
//!
//! The loop owns its `RefreshState`; only [`Renderer::pause`] and
//! [`Renderer::resume`] move it. Cycles are awaited inline, so a cycle never
//! overlaps the previous one and a pause issued during a cycle takes effect
//! right after it renders.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::classifier::{classify, DisplayType};
use crate::error::{Error, Result};
use crate::models::domain::PacketRecord;
use crate::parser;
use crate::summary::{count_label, format_time, summarize, EMPTY_PLACEHOLDER};

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Where the snapshot body comes from.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;
}

/// Where finished boards go.
pub trait BoardSink: Send {
    fn render(&mut self, board: &Board) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub badge: DisplayType,
    pub time: String,
    pub lines: Vec<String>,
    pub scope: String,
    pub scope_class: String,
}

impl Card {
    pub fn from_record<Tz>(record: &PacketRecord, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let class = classify(record);
        Card {
            badge: class.display_type,
            time: format_time(record.timestamp, tz),
            lines: summarize(record),
            scope_class: class.scope_class(),
            scope: class.scope_label,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.badge, self.time)?;
        for line in &self.lines {
            writeln!(f, "  {}", line)?;
        }
        writeln!(f, "  <{}>", self.scope)
    }
}

/// One fully rendered snapshot. Each cycle builds a new one from scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub cards: Vec<Card>,
    pub count_label: String,
}

impl Board {
    pub fn from_records(records: &[PacketRecord]) -> Self {
        Self::from_records_in(records, &Local)
    }

    pub fn from_records_in<Tz>(records: &[PacketRecord], tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Board {
            cards: records.iter().map(|r| Card::from_record(r, tz)).collect(),
            count_label: count_label(records.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.count_label)?;
        if self.is_empty() {
            return writeln!(f, "{}", EMPTY_PLACEHOLDER);
        }
        for card in &self.cards {
            writeln!(f)?;
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

/// Redraws the whole board on a terminal (or any writer).
pub struct TerminalSink<W> {
    out: W,
    clear: bool,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout() -> Self {
        TerminalSink {
            out: io::stdout(),
            clear: true,
        }
    }
}

impl<W: Write> TerminalSink<W> {
    /// Plain sink without screen clearing.
    pub fn new(out: W) -> Self {
        TerminalSink { out, clear: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> BoardSink for TerminalSink<W> {
    fn render(&mut self, board: &Board) -> Result<()> {
        if self.clear {
            write!(self.out, "\x1b[2J\x1b[H")?;
        }
        write!(self.out, "{}", board)?;
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Resume,
    Toggle,
    Quit,
}

impl FromStr for Control {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Ok(Control::Pause),
            "r" | "resume" => Ok(Control::Resume),
            "" | "t" | "toggle" => Ok(Control::Toggle),
            "q" | "quit" | "exit" => Ok(Control::Quit),
            other => Err(format!("unknown command {:?} (p, r, q)", other)),
        }
    }
}

pub struct Renderer<S, K> {
    source: S,
    sink: K,
    state: RefreshState,
    fetch_timeout: Duration,
    board: Option<Board>,
    cycles: u64,
}

impl<S: SnapshotSource, K: BoardSink> Renderer<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        Renderer {
            source,
            sink,
            state: RefreshState::Running,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            board: None,
            cycles: 0,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Last board that made it to the sink.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Completed cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns false if already paused.
    pub fn pause(&mut self) -> bool {
        if self.state == RefreshState::Paused {
            return false;
        }
        self.state = RefreshState::Paused;
        info!("refresh paused");
        true
    }

    /// Returns false if already running. The caller owes one immediate cycle
    /// when this returns true.
    pub fn resume(&mut self) -> bool {
        if self.state == RefreshState::Running {
            return false;
        }
        self.state = RefreshState::Running;
        info!("refresh resumed");
        true
    }

    /// Fetch, decode, classify and render once. On failure the previous
    /// board stays as it was.
    pub async fn cycle(&mut self) -> Result<&Board> {
        let body = match time::timeout(self.fetch_timeout, self.source.fetch()).await {
            Ok(body) => body?,
            Err(_) => return Err(Error::Timeout(self.fetch_timeout)),
        };

        let records = parser::decode_snapshot(&body)?;
        let board = Board::from_records(&records);
        self.sink.render(&board)?;
        self.cycles += 1;

        Ok(&*self.board.insert(board))
    }

    async fn refresh(&mut self) {
        match self.cycle().await {
            Ok(board) => debug!(cards = board.cards.len(), "board refreshed"),
            Err(e) => warn!(error = %e, "refresh failed, keeping previous board"),
        }
    }

    /// Drives cycles every `period` until `Quit` arrives or every control
    /// sender is dropped. The first cycle runs immediately.
    pub async fn run(mut self, period: Duration, mut controls: mpsc::Receiver<Control>) -> Self {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Controls first: a pause queued during a cycle must beat a
                // tick that came due meanwhile.
                biased;

                control = controls.recv() => match control {
                    Some(Control::Pause) => {
                        self.pause();
                    }
                    Some(Control::Resume) => self.resume_now(&mut ticker).await,
                    Some(Control::Toggle) => match self.state {
                        RefreshState::Running => {
                            self.pause();
                        }
                        RefreshState::Paused => self.resume_now(&mut ticker).await,
                    },
                    Some(Control::Quit) | None => break,
                },
                _ = ticker.tick(), if self.state == RefreshState::Running => {
                    self.refresh().await;
                }
            }
        }

        info!(cycles = self.cycles, "renderer stopped");
        self
    }

    async fn resume_now(&mut self, ticker: &mut time::Interval) {
        if self.resume() {
            self.refresh().await;
            ticker.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::decode_snapshot;
    use chrono::Utc;

    const SNAPSHOT: &[u8] = br#"[
        {"timestamp": 1700000000, "scope": "INTERNET",
         "ip": {"src_ip": "192.168.1.10", "dst_ip": "142.250.1.1", "protocol": 6, "ttl": 64},
         "tcp": {"src_port": 51000, "dst_port": 443, "service": "HTTPS", "flags": "SYN,ACK"}},
        {"timestamp": 1700000001,
         "arp": {"opcode": 2, "src_ip": "192.168.1.1", "src_mac": "aa:bb:cc:dd:ee:ff",
                 "target_ip": "192.168.1.10", "target_mac": "11:22:33:44:55:66"}}
    ]"#;

    #[test]
    fn board_from_records() {
        let records = decode_snapshot(SNAPSHOT).unwrap();
        let board = Board::from_records_in(&records, &Utc);

        assert_eq!(board.count_label, "2 paquets");
        assert_eq!(board.cards[0].badge, DisplayType::Tcp);
        assert_eq!(board.cards[0].time, "22:13:20");
        assert_eq!(board.cards[0].scope_class, "internet");
        assert_eq!(board.cards[0].lines[4], "Info: HTTPS (SYN,ACK)");
        assert_eq!(board.cards[1].badge, DisplayType::Arp);
        assert_eq!(board.cards[1].scope, "UNKNOWN");
        assert_eq!(board.cards[1].lines[0], "Opcode: Reply");
    }

    #[test]
    fn empty_board_shows_placeholder() {
        let board = Board::from_records_in(&[], &Utc);
        assert_eq!(board.to_string(), "== 0 paquet ==\nEn attente de paquets...\n");
    }

    #[test]
    fn terminal_sink_writes_cards() {
        let records = decode_snapshot(SNAPSHOT).unwrap();
        let board = Board::from_records_in(&records[1..], &Utc);

        let mut sink = TerminalSink::new(Vec::new());
        sink.render(&board).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        assert_eq!(
            text,
            "== 1 paquet ==\n\n\
             [ARP] 22:13:21\n\
             \x20 Opcode: Reply\n\
             \x20 Source: 192.168.1.1 (aa:bb:cc:dd:ee:ff)\n\
             \x20 Destinataire: 192.168.1.10 (11:22:33:44:55:66)\n\
             \x20 <UNKNOWN>\n"
        );
    }

    #[test]
    fn control_commands() {
        assert_eq!("p".parse::<Control>(), Ok(Control::Pause));
        assert_eq!(" Resume\n".parse::<Control>(), Ok(Control::Resume));
        assert_eq!("".parse::<Control>(), Ok(Control::Toggle));
        assert_eq!("q".parse::<Control>(), Ok(Control::Quit));
        assert!("x".parse::<Control>().is_err());
    }
}

use std::{fmt, io, rc::Rc, str::FromStr};

use anyhow::{Context as _, Result, anyhow, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use tracing::{debug, info};
use triad::{
    ActivityResult, BackPress, Intent, ScreenHandle, ScreenPayload, Triad, TriadDelegate,
    host::RESULT_OK,
};

use crate::{
    mail::{ATTACHMENT_EXTRA, ComposeScreen, InboxScreen, Mailbox, MessageScreen, PICK_ATTACHMENT},
    stage::TerminalHost,
};

/// One scripted user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open a message.
    Open(u64),
    /// Start a new message.
    Compose,
    /// Reply to the message on screen.
    Reply,
    /// Press back.
    Back,
    /// Return to the inbox, dropping everything above it.
    Home,
    /// Deliver an attachment-picker result with this result code.
    Attach(i32),
    /// Hide the window.
    Pause,
    /// Show the window again.
    Resume,
    /// Destroy and recreate the window, as on a configuration change.
    Recreate,
    /// Quit.
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().ok_or_else(|| anyhow!("empty command"))?;
        let arg = parts.next();
        if let Some(extra) = parts.next() {
            bail!("unexpected argument {extra:?} in {s:?}");
        }
        let command = match (verb, arg) {
            ("open", Some(id)) => Self::Open(id.parse().with_context(|| format!("bad id {id:?}"))?),
            ("compose", None) => Self::Compose,
            ("reply", None) => Self::Reply,
            ("back", None) => Self::Back,
            ("home", None) => Self::Home,
            ("attach", None) => Self::Attach(RESULT_OK),
            ("attach", Some(code)) => {
                Self::Attach(code.parse().with_context(|| format!("bad code {code:?}"))?)
            }
            ("pause", None) => Self::Pause,
            ("resume", None) => Self::Resume,
            ("recreate", None) => Self::Recreate,
            ("quit", None) => Self::Quit,
            _ => bail!("unknown command {s:?}"),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(id) => write!(f, "open {id}"),
            Self::Compose => f.write_str("compose"),
            Self::Reply => f.write_str("reply"),
            Self::Back => f.write_str("back"),
            Self::Home => f.write_str("home"),
            Self::Attach(code) => write!(f, "attach {code}"),
            Self::Pause => f.write_str("pause"),
            Self::Resume => f.write_str("resume"),
            Self::Recreate => f.write_str("recreate"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

/// Parse a deep link of the form `key` or `key:{json args}`. Several links
/// separated by `/` describe a backstack, bottom first.
pub fn parse_link(link: &str) -> Result<Intent> {
    let payloads = link
        .split('/')
        .map(|part| match part.split_once(':') {
            Some((key, args)) => {
                let args: serde_json::Value =
                    serde_json::from_str(args).with_context(|| format!("bad args for {key}"))?;
                Ok(ScreenPayload::with_args(key, &args)?)
            }
            None => Ok(ScreenPayload::new(part)),
        })
        .collect::<Result<Vec<_>>>()?;
    let intent = match payloads.as_slice() {
        [single] => Intent::for_screen(single)?,
        many => Intent::for_backstack(many)?,
    };
    Ok(intent)
}

/// Whether the demo is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Running,
    /// The window finished.
    Finished,
}

/// A mail client in a simulated window.
pub struct Demo {
    /// Shared navigator, outliving individual windows.
    triad: Triad<Mailbox>,
    /// Application component.
    mailbox: Mailbox,
    /// The current window.
    host: Rc<TerminalHost>,
    /// The current window's delegate.
    delegate: TriadDelegate<Mailbox>,
}

impl Demo {
    /// Open a window, following `link` if given. Without a usable link the
    /// inbox is shown.
    pub fn new(mailbox: Mailbox, link: Option<&Intent>) -> Result<Self> {
        let triad = Triad::new();
        let (host, delegate) = Self::window(&triad, &mailbox)?;
        delegate.on_create(link)?;
        if triad.backstack().is_empty() {
            debug!("no deep link, starting at the inbox");
            triad.start_with(ScreenHandle::new(InboxScreen::new()))?;
        }
        delegate.on_resume()?;
        Ok(Self {
            triad,
            mailbox,
            host,
            delegate,
        })
    }

    /// Build a window and its delegate.
    fn window(
        triad: &Triad<Mailbox>,
        mailbox: &Mailbox,
    ) -> Result<(Rc<TerminalHost>, TriadDelegate<Mailbox>)> {
        let host = TerminalHost::new();
        let delegate = TriadDelegate::builder(host.clone(), triad.clone(), mailbox.clone())
            .registry(crate::mail::registry()?)
            .on_screen_changed(|screen| info!(screen = %screen.name(), "screen changed"))
            .build();
        Ok((host, delegate))
    }

    /// The navigator.
    pub fn triad(&self) -> &Triad<Mailbox> {
        &self.triad
    }

    /// The current window.
    pub fn host(&self) -> &TerminalHost {
        &self.host
    }

    /// The application component.
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// The id of the message on screen, if a message is shown.
    fn shown_message(&self) -> Option<u64> {
        let screen = self.delegate.current_screen()?;
        screen.name().as_str().strip_prefix("message_")?.parse().ok()
    }

    /// Perform one command.
    pub fn run(&mut self, command: Command) -> Result<Outcome> {
        info!(%command, "running");
        match command {
            Command::Open(id) => {
                if self.mailbox.get(id).is_none() {
                    bail!("no message {id}");
                }
                self.triad.go_to(ScreenHandle::new(MessageScreen::new(id)));
            }
            Command::Compose => self
                .triad
                .go_to(ScreenHandle::new(ComposeScreen::new(None))),
            Command::Reply => {
                let Some(id) = self.shown_message() else {
                    bail!("reply needs a message on screen");
                };
                self.triad
                    .go_to(ScreenHandle::new(ComposeScreen::new(Some(id))));
            }
            Command::Back => {
                if self.delegate.on_back_pressed()? == BackPress::Finish {
                    return self.quit();
                }
            }
            Command::Home => {
                let root = self.triad.backstack().root().cloned();
                match root {
                    Some(root) if self.triad.backstack().len() > 1 => {
                        self.triad.go_back_to(move |s| s.ptr_eq(&root));
                    }
                    _ => debug!("already home"),
                }
            }
            Command::Attach(code) => {
                let mut data = Intent::new();
                data.put_extra(ATTACHMENT_EXTRA, &"notes.txt")?;
                let result = ActivityResult::new(PICK_ATTACHMENT, code).with_data(data);
                if !self.delegate.on_activity_result(&result)? {
                    info!("nothing on screen takes attachments");
                }
            }
            Command::Pause => self.delegate.on_pause()?,
            Command::Resume => self.delegate.on_resume()?,
            Command::Recreate => {
                self.delegate.on_pause()?;
                self.delegate.on_destroy()?;
                let (host, delegate) = Self::window(&self.triad, &self.mailbox)?;
                delegate.on_create(None)?;
                delegate.on_resume()?;
                self.host = host;
                self.delegate = delegate;
            }
            Command::Quit => return self.quit(),
        }
        Ok(Outcome::Running)
    }

    /// Finish the window.
    fn quit(&mut self) -> Result<Outcome> {
        self.host.finish();
        self.delegate.on_pause()?;
        self.delegate.on_destroy()?;
        Ok(Outcome::Finished)
    }

    /// Run every command, stopping early if the window finishes.
    pub fn run_all(&mut self, commands: &[Command]) -> Result<Outcome> {
        for command in commands {
            if self.run(*command)? == Outcome::Finished {
                return Ok(Outcome::Finished);
            }
        }
        Ok(Outcome::Running)
    }

    /// A table of the backstack, top first.
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["#", "screen", "lifecycle", "attached"]);
        let backstack = self.triad.backstack();
        for (depth, screen) in backstack.reverse_iter().iter().enumerate() {
            let attached = if screen.is_attached() { "yes" } else { "" };
            table.add_row(vec![
                Cell::new(depth).fg(Color::Green),
                Cell::new(screen.name()),
                Cell::new(format!("{:?}", screen.lifecycle())),
                Cell::new(attached),
            ]);
        }
        table
    }

    /// What the stage shows, as text.
    pub fn render(&self) -> String {
        let titles = self.host.stage().titles();
        if titles.is_empty() {
            return "(empty stage)".into();
        }
        titles.join(" | ")
    }

    /// Print the backstack table and the stage.
    pub fn print(&self, w: &mut dyn io::Write) -> Result<()> {
        writeln!(w, "{}", self.table())?;
        writeln!(w, "stage: {}", self.render())?;
        Ok(())
    }
}

impl fmt::Debug for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Demo")
            .field("triad", &self.triad)
            .field("stage", &self.host.stage().titles())
            .finish()
    }
}

/// Parse commands, failing on the first bad one.
pub fn parse_commands(commands: &[String]) -> Result<Vec<Command>> {
    commands
        .iter()
        .map(|c| c.parse().with_context(|| format!("parsing {c:?}")))
        .collect()
}

/// Usage for every command.
const USAGE: &[(&str, &str)] = &[
    ("open <id>", "open a message"),
    ("compose", "start a new message"),
    ("reply", "reply to the message on screen"),
    ("back", "press back"),
    ("home", "return to the inbox"),
    ("attach [code]", "deliver an attachment result, OK by default"),
    ("pause", "hide the window"),
    ("resume", "show the window"),
    ("recreate", "destroy and rebuild the window"),
    ("quit", "finish the window"),
];

/// Print a table of available commands.
pub fn print_command_table(w: &mut dyn io::Write) -> Result<()> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(UTF8_FULL);
    for (command, help) in USAGE {
        table.add_row(vec![Cell::new(command).fg(Color::Green), Cell::new(help)]);
    }
    writeln!(w, "{table}")?;
    Ok(())
}

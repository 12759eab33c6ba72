use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io;
use std::rc::Rc;
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use crossterm::event::KeyCode;
use crossterm::terminal;
use ratatui::Terminal;
use ratatui::prelude::{Backend, CrosstermBackend};
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

use alder::config::TerminalConfig;
use alder::prelude::*;
use alder::renderer::document::{Document, NodeId};
use alder::renderer::terminal::Screen;
use alder::subscription::terminal::{KeyInput, KeyMap};
use alder::subscription::time::Timer;

#[derive(Debug, Clone)]
enum Message {
    Up,
    Down,
    Tick,
    Quit,
}

#[derive(Debug, Default)]
struct Counter {
    count: i64,
    uptime: u32,
    quit: bool,
}

impl Application for Counter {
    type Message = Message;
    type Flags = ();

    fn init(_flags: ()) -> (Self, Command<Message>) {
        (Self::default(), Command::none())
    }

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Up => self.count += 1,
            Message::Down => self.count -= 1,
            Message::Tick => self.uptime += 1,
            Message::Quit => self.quit = true,
        }
        Command::none()
    }

    fn view(&self) -> Option<VirtualNode> {
        let color = if self.count < 0 { "red" } else { "green" };
        Some(el(
            "div",
            Props::new(),
            [
                el(
                    "p",
                    Props::new().with("bold", true),
                    [
                        text("count: "),
                        el("span", Props::new().with("fg", color), [text(self.count.to_string())]),
                    ],
                ),
                el("p", Props::new(), [text(format!("uptime: {}s", self.uptime))]),
                el(
                    "p",
                    Props::new().with("fg", "gray"),
                    [text("u: up  d: down  q: quit")],
                ),
            ],
        ))
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if self.quit {
            return vec![];
        }
        let keys = KeyMap::new()
            .bind(KeyCode::Char('u'), Message::Up)
            .bind(KeyCode::Char('d'), Message::Down)
            .bind(KeyCode::Char('q'), Message::Quit)
            .bind(KeyCode::Esc, Message::Quit);
        vec![
            Subscription::new(KeyInput::new(keys)),
            Subscription::new(Timer::new(1000)).map(|_| Message::Tick),
        ]
    }
}

// The screen belongs to the UI, so logs go to a file and only when RUST_LOG is set.
fn init_logging() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(File::create("counter.log")?))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn draw_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    runtime: &Runtime<Counter, Rc<RefCell<Document>>>,
    document: &RefCell<Document>,
    root: NodeId,
) -> Result<()> {
    let mut frames = tokio::time::interval(TerminalConfig::default().frame_duration());
    loop {
        frames.tick().await;
        if runtime.with_state(|app| app.quit)? {
            return Ok(());
        }
        terminal.draw(|frame| {
            frame.render_widget(Screen::new(&document.borrow(), root), frame.area());
        })?;
    }
}

async fn run() -> Result<()> {
    let document = Rc::new(RefCell::new(Document::new()));
    let mounted = Rc::new(Cell::new(None));
    let sink = Rc::clone(&mounted);

    let runtime = Runtime::<Counter, _>::start(
        (),
        Rc::clone(&document),
        Mount::sink(move |root: &NodeId| sink.set(Some(*root))),
    )?;
    let root = mounted.get().ok_or_else(|| eyre!("runtime did not mount a root"))?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, terminal::EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = draw_loop(&mut terminal, &runtime, &document, root).await;
    runtime.shutdown()?;

    // Restore terminal
    terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging()?;
    LocalSet::new().run_until(run()).await
}

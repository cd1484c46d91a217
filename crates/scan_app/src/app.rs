use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use scan_core::{update, AppState, Msg, ReportState, SelectedImage};
use scan_engine::{AtomicFileWriter, EngineHandle};
use scan_logging::{scan_info, scan_warn};

use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::input::{parse_command, Command, HELP};
use crate::render::render;

/// Render/poll cadence while waiting for input.
const TICK: Duration = Duration::from_millis(75);

enum Input {
    Msg(Msg),
    Quit,
}

pub fn run(config: AppConfig, preselect: Option<PathBuf>) -> anyhow::Result<()> {
    let engine = EngineHandle::new(config.client_settings()).context("starting engine")?;
    let runner = EffectRunner::new(engine, AtomicFileWriter::new(config.output_dir.clone()));
    let mut app = App::new(AppState::with_policy(config.submit_policy.into()), runner);

    println!("{HELP}");
    if let Some(path) = preselect {
        if let Some(msg) = select_msg(path) {
            app.dispatch(msg);
        }
    }
    app.render_if_dirty();

    let input_rx = spawn_stdin_reader();
    let mut stdin_closed = false;
    loop {
        app.pump_engine();

        if stdin_closed {
            // Scripted input ended; finish outstanding work before exiting.
            if !app.has_work_in_flight() {
                break;
            }
            thread::sleep(TICK);
            app.dispatch(Msg::Tick);
        } else {
            match input_rx.recv_timeout(TICK) {
                Ok(Input::Msg(msg)) => app.dispatch(msg),
                Ok(Input::Quit) => break,
                Err(RecvTimeoutError::Timeout) => app.dispatch(Msg::Tick),
                Err(RecvTimeoutError::Disconnected) => stdin_closed = true,
            }
        }

        app.render_if_dirty();
    }

    scan_info!("scan_app exiting");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            queue.extend(self.runner.run(effects));
        }
    }

    fn pump_engine(&mut self) {
        while let Some(msg) = self.runner.try_recv() {
            self.dispatch(msg);
        }
    }

    fn has_work_in_flight(&self) -> bool {
        let view = self.state.view();
        view.busy || view.report == ReportState::Generating
    }

    fn render_if_dirty(&mut self) {
        if self.state.consume_dirty() {
            println!("{}\n", render(&self.state.view()));
        }
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<Input> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let input = match parse_command(&line) {
                Ok(Command::Select(path)) => {
                    let msg = path.and_then(select_msg).unwrap_or(Msg::FileSelected(None));
                    Input::Msg(msg)
                }
                Ok(Command::Analyze) => Input::Msg(Msg::AnalyzeClicked),
                Ok(Command::Report) => Input::Msg(Msg::ReportClicked),
                Ok(Command::Dismiss) => Input::Msg(Msg::DismissNotification),
                Ok(Command::Help) => {
                    println!("{HELP}");
                    continue;
                }
                Ok(Command::Quit) => Input::Quit,
                Err(message) => {
                    if !message.is_empty() {
                        println!("{message}");
                    }
                    continue;
                }
            };
            let quit = matches!(input, Input::Quit);
            if tx.send(input).is_err() || quit {
                break;
            }
        }
    });
    rx
}

/// A file picker only offers existing files; anything else counts as no selection.
fn select_msg(path: PathBuf) -> Option<Msg> {
    if path.is_file() {
        Some(Msg::FileSelected(Some(SelectedImage::new(path))))
    } else {
        scan_warn!("Ignoring selection of {:?}: not a file", path);
        println!("No such file: {}", path.display());
        None
    }
}

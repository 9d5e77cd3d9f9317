use ansi_term::Style;
use basic::mach::{Event, Runtime};
use linefeed::{Completer, Completion, Interface, Prompter, ReadResult, Signal, Terminal};
use log::debug;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn main() {
    env_logger::init();
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl-C handler: {}", error);
    }
    let mut queued = VecDeque::new();
    if let Some(file) = std::env::args().nth(1) {
        queued.push_back(format!("LOAD \"{}\"", file.replace('"', "")));
        queued.push_back("RUN".to_string());
    }
    if let Err(error) = main_loop(interrupted, queued) {
        eprintln!("{}", error);
    }
}

fn main_loop(interrupted: Arc<AtomicBool>, mut queued: VecDeque<String>) -> std::io::Result<()> {
    let mut runtime = Runtime::default();
    let command = Interface::new("BASIC")?;
    let input = Interface::new("INPUT")?;
    input.set_report_signal(Signal::Interrupt, true);
    let mut print_ready = queued.is_empty();

    loop {
        if interrupted.load(Ordering::SeqCst) {
            runtime.interrupt();
            interrupted.store(false, Ordering::SeqCst);
        };
        match runtime.execute(5000) {
            Event::Stopped => {
                if runtime.exited() {
                    break;
                }
                if let Some(line) = queued.pop_front() {
                    debug!("queued: {}", line);
                    runtime.enter(&line);
                    continue;
                }
                if print_ready {
                    print_ready = false;
                    command.write_fmt(format_args!("READY.\n"))?;
                }
                command.set_completer(Arc::new(LineCompleter::new(&runtime.listing())));
                let string = match command.read_line()? {
                    ReadResult::Input(string) => string,
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                };
                if runtime.enter(&string) {
                    command.add_history_unique(string);
                }
            }
            Event::Input(prompt) => {
                input.set_prompt(&prompt)?;
                match input.read_line()? {
                    ReadResult::Input(string) => {
                        runtime.enter(&string);
                        input.add_history_unique(string);
                    }
                    ReadResult::Signal(Signal::Interrupt) => {
                        input.set_buffer("")?;
                        input.lock_reader().cancel_read_line()?;
                        runtime.interrupt();
                    }
                    ReadResult::Signal(_) | ReadResult::Eof => break,
                };
            }
            Event::Errors(errors) => {
                queued.clear();
                for error in errors.iter() {
                    command.write_fmt(format_args!(
                        "{}\n",
                        Style::new().bold().paint(format!("?{}", error))
                    ))?;
                }
                print_ready = true;
            }
            Event::Running => {}
            Event::Print(s) => {
                command.write_fmt(format_args!("{}", s))?;
            }
        }
    }
    Ok(())
}

/// Tab after a line number brings back the text of that line.
struct LineCompleter {
    lines: Vec<(u16, String)>,
}

impl LineCompleter {
    fn new(listing: &str) -> LineCompleter {
        let lines = listing
            .lines()
            .filter_map(|line| {
                let digits = line.split(' ').next()?;
                Some((digits.parse().ok()?, line.to_string()))
            })
            .collect();
        LineCompleter { lines }
    }
}

impl<Term: Terminal> Completer<Term> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        let number: u16 = prompter.buffer().trim().parse().ok()?;
        let (_, text) = self.lines.iter().find(|(n, _)| *n == number)?;
        let mut comp = Completion::simple(text.clone());
        comp.suffix = linefeed::complete::Suffix::None;
        Some(vec![comp])
    }
}

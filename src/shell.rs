use std::io::{self, BufRead, Write};

use crate::app::{AppError, TerminalDashboard};
use crate::domain::task::TaskId;
use crate::form::TaskForm;
use crate::projection::{PriorityFilter, SortKey, StatusFilter};
use crate::ui::{self, Palette};
use crate::wiring::{Event, Prompter, Update};

const HELP: &str = "\
commands:
  add                       create a task (prompts for each field)
  done <id>                 toggle completed/pending
  rename <id>               rename a task (prompts for the new name)
  rm <id>                   delete a task
  status <all|completed|pending>
  priority <all|low|medium|high>
  sort <none|name|date>
  show                      redraw every panel
  help                      show this help
  quit                      leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Dispatch(Event),
    Add,
    Show,
    Help,
    Quit,
}

/// Line-oriented session: reads commands from `input`, dispatches them and
/// writes the refreshed panels to `output`. Prompts read from the same input.
pub struct Session<R, W> {
    input: R,
    output: W,
    palette: Palette,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, palette: Palette) -> Self {
        Self {
            input,
            output,
            palette,
        }
    }

    pub fn run(&mut self, dashboard: &mut TerminalDashboard) -> Result<(), AppError> {
        let frame = dashboard.refresh();
        let rendered = ui::render_frame(&frame, dashboard.chart(), &self.palette);
        write!(self.output, "{rendered}")?;
        writeln!(self.output, "{}", self.palette.dim("type 'help' for commands"))?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(message) => {
                    self.notice(&message)?;
                    continue;
                }
            };
            tracing::trace!(?command, "session command");

            match command {
                Command::Quit => break,
                Command::Help => writeln!(self.output, "{HELP}")?,
                Command::Show => {
                    let frame = dashboard.refresh();
                    let rendered = ui::render_frame(&frame, dashboard.chart(), &self.palette);
                    write!(self.output, "{rendered}")?;
                }
                Command::Add => {
                    let Some(form) = self.read_form()? else {
                        break;
                    };
                    self.dispatch(dashboard, Event::Submit(form))?;
                }
                Command::Dispatch(event) => self.dispatch(dashboard, event)?,
            }
        }
        Ok(())
    }

    fn dispatch(
        &mut self,
        dashboard: &mut TerminalDashboard,
        event: Event,
    ) -> Result<(), AppError> {
        match dashboard.handle(event, self) {
            Ok(Update::Full(frame)) => {
                let rendered = ui::render_frame(&frame, dashboard.chart(), &self.palette);
                write!(self.output, "{rendered}")?;
            }
            Ok(Update::Table(rows)) => {
                let rendered = ui::render_table(&rows, &dashboard.query(), &self.palette);
                write!(self.output, "{rendered}")?;
            }
            Ok(Update::Unchanged) => self.notice("nothing changed")?,
            Err(AppError::Form(err)) => self.notice(&err.to_string())?,
            Err(err) => return Err(err),
        }
        Ok(())
    }

    fn read_form(&mut self) -> Result<Option<TaskForm>, AppError> {
        let mut fields = Vec::with_capacity(4);
        for label in [
            "Name",
            "Description (optional)",
            "Due date (YYYY-MM-DD)",
            "Priority (Low/Medium/High)",
        ] {
            write!(self.output, "{label}: ")?;
            self.output.flush()?;
            match self.read_line()? {
                Some(value) => fields.push(value),
                None => return Ok(None),
            }
        }
        let mut fields = fields.into_iter();
        Ok(Some(TaskForm {
            name: fields.next().unwrap_or_default(),
            description: fields.next().unwrap_or_default(),
            due_date: fields.next().unwrap_or_default(),
            priority: fields.next().unwrap_or_default(),
        }))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", self.palette.dim(message))
    }
}

impl<R: BufRead, W: Write> Prompter for Session<R, W> {
    /// An empty answer keeps `initial`; end of input cancels.
    fn ask(&mut self, message: &str, initial: &str) -> Option<String> {
        let written = write!(self.output, "{message} [{initial}] ");
        if written.and_then(|_| self.output.flush()).is_err() {
            return None;
        }
        match self.read_line() {
            Ok(Some(answer)) if answer.is_empty() => Some(initial.to_string()),
            Ok(Some(answer)) => Some(answer),
            Ok(None) | Err(_) => None,
        }
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let argument = parts.collect::<Vec<_>>().join(" ");

    let command = match verb.as_str() {
        "add" | "new" => Command::Add,
        "done" | "toggle" => Command::Dispatch(Event::ToggleComplete(parse_id(&argument)?)),
        "rename" | "edit" => Command::Dispatch(Event::Rename(parse_id(&argument)?)),
        "rm" | "delete" => Command::Dispatch(Event::Delete(parse_id(&argument)?)),
        "status" => Command::Dispatch(Event::SetStatusFilter(
            argument
                .parse::<StatusFilter>()
                .map_err(|err| err.to_string())?,
        )),
        "priority" => Command::Dispatch(Event::SetPriorityFilter(
            argument
                .parse::<PriorityFilter>()
                .map_err(|err| err.to_string())?,
        )),
        "sort" => Command::Dispatch(Event::SetSort(
            argument.parse::<SortKey>().map_err(|err| err.to_string())?,
        )),
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(format!("unknown command '{verb}'; type 'help'")),
    };
    Ok(command)
}

fn parse_id(raw: &str) -> Result<TaskId, String> {
    raw.trim()
        .parse::<TaskId>()
        .map_err(|_| format!("expected a numeric task id, got '{}'", raw.trim()))
}

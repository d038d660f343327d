//! Named commands bound to keys.
//!
//! A [`Command`] declares which parts of the application it touches
//! ([`Capability`]) and which parameters the user is prompted for
//! ([`Param`]). The [`CommandTable`] owns the registry and runs commands
//! against an [`App`], turning every result into a [`CmdOutcome`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::controller::Controller;
use crate::error::CmdError;
use crate::fixfmt::Adjustment;
use crate::io;
use crate::model::Table;
use crate::state::{App, Session};
use crate::view::ViewState;

/// A part of the application a command may act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// The table model. The view's row count is refreshed afterwards.
    Table,
    View,
    Controller,
    Session,
}

/// A value the user is prompted for before the command runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
}

/// The user cancelled a prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aborted;

/// Successful result, with an optional message for the status line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CmdResult {
    pub msg: Option<String>,
    /// The table changed.
    pub modified: bool,
}

impl CmdResult {
    pub fn msg(msg: impl Into<String>) -> Self {
        Self {
            msg: Some(msg.into()),
            modified: false,
        }
    }

    pub fn modified(mut self) -> Self {
        self.modified = true;
        self
    }
}

#[derive(Debug)]
pub enum CmdOutcome {
    Done(CmdResult),
    Failed(CmdError),
    /// A prompt was cancelled; nothing ran.
    Aborted,
}

/// The parts of [`App`] a running command declared it needs.
pub struct CommandContext<'a> {
    pub table: Option<&'a mut Table>,
    pub view: Option<&'a mut ViewState>,
    pub controller: Option<&'a mut Controller>,
    pub session: Option<&'a mut Session>,
}

/// Borrows one declared part of a context.
fn need<'s, T>(slot: &'s mut Option<&mut T>, capability: Capability) -> Result<&'s mut T, CmdError> {
    slot.as_deref_mut()
        .ok_or_else(|| CmdError::msg(format!("command lacks {:?} access", capability)))
}

impl CommandContext<'_> {
    pub fn table(&mut self) -> Result<&mut Table, CmdError> {
        need(&mut self.table, Capability::Table)
    }

    pub fn view(&mut self) -> Result<&mut ViewState, CmdError> {
        need(&mut self.view, Capability::View)
    }

    pub fn controller(&mut self) -> Result<&mut Controller, CmdError> {
        need(&mut self.controller, Capability::Controller)
    }

    pub fn session(&mut self) -> Result<&mut Session, CmdError> {
        need(&mut self.session, Capability::Session)
    }
}

type RunFn = fn(&mut CommandContext<'_>, &[String]) -> Result<CmdResult, CmdError>;

#[derive(Clone, Copy)]
pub enum Action {
    Run(RunFn),
    /// Prompt for a command name and run that command.
    Dispatch,
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Run(_) => f.write_str("Run"),
            Action::Dispatch => f.write_str("Dispatch"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Command {
    pub name: &'static str,
    pub needs: &'static [Capability],
    pub params: &'static [Param],
    pub action: Action,
}

impl Command {
    pub const fn new(
        name: &'static str,
        needs: &'static [Capability],
        params: &'static [Param],
        run: RunFn,
    ) -> Self {
        Self {
            name,
            needs,
            params,
            action: Action::Run(run),
        }
    }

    fn needs(&self, capability: Capability) -> bool {
        self.needs.contains(&capability)
    }
}

/// Registry of commands by name.
#[derive(Debug, Default)]
pub struct CommandTable {
    commands: BTreeMap<&'static str, Command>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in command.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for command in DEFAULT_COMMANDS {
            // Built-in names are distinct.
            let _ = table.register(*command);
        }
        table
    }

    /// Fails if the name is already taken.
    pub fn register(&mut self, command: Command) -> Result<(), CmdError> {
        if self.commands.contains_key(command.name) {
            return Err(CmdError::msg(format!(
                "command name {} already used",
                command.name
            )));
        }
        self.commands.insert(command.name, command);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Runs a command, prompting through `input` for its parameters.
    pub fn execute(
        &self,
        name: &str,
        app: &mut App,
        input: &mut dyn FnMut(&str) -> Result<String, Aborted>,
    ) -> CmdOutcome {
        let Some(command) = self.get(name) else {
            return CmdOutcome::Failed(CmdError::UnknownCommand(name.to_string()));
        };
        let run = match command.action {
            Action::Run(run) => run,
            Action::Dispatch => {
                return match input("command: ") {
                    Ok(name) => self.execute(name.trim(), app, input),
                    Err(Aborted) => CmdOutcome::Aborted,
                };
            }
        };

        let mut args = Vec::with_capacity(command.params.len());
        for param in command.params {
            match input(&format!("{} {}: ", command.name, param.name)) {
                Ok(arg) => args.push(arg),
                Err(Aborted) => {
                    debug!(command = command.name, "aborted");
                    return CmdOutcome::Aborted;
                }
            }
        }

        debug!(command = command.name, ?args, "run command");
        let mut ctx = CommandContext {
            table: command.needs(Capability::Table).then_some(&mut app.table),
            view: command.needs(Capability::View).then_some(&mut app.view),
            controller: command
                .needs(Capability::Controller)
                .then_some(&mut app.controller),
            session: command.needs(Capability::Session).then_some(&mut app.session),
        };
        let result = run(&mut ctx, &args);

        if command.needs(Capability::Table) {
            app.view.set_row_count(app.table.row_count());
        }
        match result {
            Ok(result) => {
                if result.modified {
                    app.session.dirty = true;
                }
                CmdOutcome::Done(result)
            }
            Err(err) => {
                warn!(command = command.name, error = %err, "command failed");
                CmdOutcome::Failed(err)
            }
        }
    }
}

const TABLE: Capability = Capability::Table;
const VIEW: Capability = Capability::View;
const CONTROLLER: Capability = Capability::Controller;
const SESSION: Capability = Capability::Session;

const DEFAULT_COMMANDS: &[Command] = &[
    Command::new("move-left", &[VIEW], &[], |ctx, _| {
        ctx.view()?.move_cursor_column(-1);
        Ok(CmdResult::default())
    }),
    Command::new("move-right", &[VIEW], &[], |ctx, _| {
        ctx.view()?.move_cursor_column(1);
        Ok(CmdResult::default())
    }),
    Command::new("move-up", &[VIEW], &[], |ctx, _| {
        ctx.view()?.move_cursor_row(-1);
        Ok(CmdResult::default())
    }),
    Command::new("move-down", &[VIEW], &[], |ctx, _| {
        ctx.view()?.move_cursor_row(1);
        Ok(CmdResult::default())
    }),
    Command::new("page-up", &[VIEW], &[], |ctx, _| {
        ctx.view()?.move_cursor_page(-1);
        Ok(CmdResult::default())
    }),
    Command::new("page-down", &[VIEW], &[], |ctx, _| {
        ctx.view()?.move_cursor_page(1);
        Ok(CmdResult::default())
    }),
    Command::new("move-to-first-row", &[VIEW], &[], |ctx, _| {
        ctx.view()?.move_cursor_to(None, Some(0));
        Ok(CmdResult::default())
    }),
    Command::new("move-to-last-row", &[VIEW], &[], |ctx, _| {
        ctx.view()?.move_cursor_to(None, Some(usize::MAX));
        Ok(CmdResult::default())
    }),
    Command::new("go-to-row", &[VIEW], &[Param { name: "row" }], go_to_row),
    Command::new("scroll-left", &[VIEW], &[], |ctx, _| {
        ctx.view()?.scroll_by(-1, 0);
        Ok(CmdResult::default())
    }),
    Command::new("scroll-right", &[VIEW], &[], |ctx, _| {
        ctx.view()?.scroll_by(1, 0);
        Ok(CmdResult::default())
    }),
    Command::new("scroll-up", &[VIEW], &[], |ctx, _| {
        ctx.view()?.scroll_by(0, -1);
        Ok(CmdResult::default())
    }),
    Command::new("scroll-down", &[VIEW], &[], |ctx, _| {
        ctx.view()?.scroll_by(0, 1);
        Ok(CmdResult::default())
    }),
    Command::new("toggle-show-row-num", &[VIEW], &[], |ctx, _| {
        ctx.view()?.toggle_show_row_number();
        Ok(CmdResult::default())
    }),
    Command::new("toggle-show-header", &[VIEW], &[], |ctx, _| {
        ctx.view()?.toggle_show_header();
        Ok(CmdResult::default())
    }),
    Command::new("hide-column", &[TABLE, VIEW], &[], hide_column),
    Command::new(
        "hide-column-name",
        &[TABLE, VIEW],
        &[Param { name: "name" }],
        hide_column_name,
    ),
    Command::new("show-all-columns", &[VIEW], &[], |ctx, _| {
        let shown = ctx.view()?.show_all_columns();
        Ok(CmdResult::msg(format!("columns shown: {}", shown)))
    }),
    Command::new("move-column-left", &[VIEW], &[], |ctx, _| {
        ctx.view()?.move_column(-1);
        Ok(CmdResult::default())
    }),
    Command::new("move-column-right", &[VIEW], &[], |ctx, _| {
        ctx.view()?.move_column(1);
        Ok(CmdResult::default())
    }),
    Command::new(
        "rename-column",
        &[TABLE, VIEW, CONTROLLER],
        &[Param { name: "name" }],
        rename_column,
    ),
    Command::new("increase-column-width", &[VIEW], &[], |ctx, _| {
        adjust(ctx, Adjustment::Widen)
    }),
    Command::new("decrease-column-width", &[VIEW], &[], |ctx, _| {
        adjust(ctx, Adjustment::Narrow)
    }),
    Command::new("increase-column-precision", &[VIEW], &[], |ctx, _| {
        adjust(ctx, Adjustment::MorePrecision)
    }),
    Command::new("decrease-column-precision", &[VIEW], &[], |ctx, _| {
        adjust(ctx, Adjustment::LessPrecision)
    }),
    Command::new("delete-row", &[TABLE, VIEW, CONTROLLER], &[], delete_row),
    Command::new("undo", &[TABLE, CONTROLLER], &[], undo),
    Command::new("save", &[TABLE, SESSION], &[], save),
    Command::new(
        "save-as",
        &[TABLE, SESSION],
        &[Param { name: "filename" }],
        save_as,
    ),
    Command::new("quit", &[SESSION], &[], |ctx, _| {
        ctx.session()?.quit = true;
        Ok(CmdResult::default())
    }),
    Command {
        name: "command",
        needs: &[],
        params: &[Param { name: "command" }],
        action: Action::Dispatch,
    },
];

fn go_to_row(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<CmdResult, CmdError> {
    let arg = args.first().map(|s| s.trim()).unwrap_or_default();
    let row: usize = arg
        .parse()
        .map_err(|_| CmdError::msg(format!("not a row number: {}", arg)))?;
    ctx.view()?.move_cursor_to(None, Some(row));
    Ok(CmdResult::default())
}

fn hide_column(ctx: &mut CommandContext<'_>, _: &[String]) -> Result<CmdResult, CmdError> {
    let view = ctx.view()?;
    if view.columns().visible_count() <= 1 {
        return Err(CmdError::msg("cannot hide last visible column"));
    }
    let id = view.cursor_column_id();
    view.hide_column(id)?;
    let name = ctx.table()?.get_column(id)?.name().to_string();
    Ok(CmdResult::msg(format!("column hidden: {}", name)))
}

fn hide_column_name(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<CmdResult, CmdError> {
    let name = args.first().map(String::as_str).unwrap_or_default();
    let id = ctx
        .table()?
        .columns()
        .find(|c| c.name() == name)
        .map(|c| c.id())
        .ok_or_else(|| CmdError::msg(format!("no column: {}", name)))?;
    let view = ctx.view()?;
    if view.columns().is_visible(id) && view.columns().visible_count() <= 1 {
        return Err(CmdError::msg("cannot hide last visible column"));
    }
    view.hide_column(id)?;
    Ok(CmdResult::msg(format!("column hidden: {}", name)))
}

fn rename_column(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<CmdResult, CmdError> {
    let name = args.first().map(|s| s.trim()).unwrap_or_default();
    if name.is_empty() {
        return Err(CmdError::msg("empty column name"));
    }
    let id = ctx.view()?.cursor_column_id();
    let table = need(&mut ctx.table, TABLE)?;
    let controller = need(&mut ctx.controller, CONTROLLER)?;
    let old = controller.rename_column(table, id, name)?;
    Ok(CmdResult::msg(format!("column renamed: {} -> {}", old, name)).modified())
}

fn adjust(ctx: &mut CommandContext<'_>, adjustment: Adjustment) -> Result<CmdResult, CmdError> {
    ctx.view()?.adjust_format(adjustment)?;
    Ok(CmdResult::default())
}

fn delete_row(ctx: &mut CommandContext<'_>, _: &[String]) -> Result<CmdResult, CmdError> {
    let row = ctx.view()?.cursor().row;
    let table = need(&mut ctx.table, TABLE)?;
    let controller = need(&mut ctx.controller, CONTROLLER)?;
    controller.delete_row(table, row)?;
    Ok(CmdResult::msg(format!("row deleted: {}", row)).modified())
}

fn undo(ctx: &mut CommandContext<'_>, _: &[String]) -> Result<CmdResult, CmdError> {
    let table = need(&mut ctx.table, TABLE)?;
    let controller = need(&mut ctx.controller, CONTROLLER)?;
    match controller.undo(table)? {
        Some(action) => Ok(CmdResult::msg(format!("undo: {}", action.describe())).modified()),
        None => Err(CmdError::msg("nothing to undo")),
    }
}

fn save(ctx: &mut CommandContext<'_>, _: &[String]) -> Result<CmdResult, CmdError> {
    let path = ctx
        .session()?
        .filename
        .clone()
        .ok_or_else(|| CmdError::msg("no filename; use save-as"))?;
    io::save_csv(ctx.table()?, &path)?;
    ctx.session()?.dirty = false;
    Ok(CmdResult::msg(format!("saved: {}", path.display())))
}

fn save_as(ctx: &mut CommandContext<'_>, args: &[String]) -> Result<CmdResult, CmdError> {
    let filename = args.first().map(|s| s.trim()).unwrap_or_default();
    if filename.is_empty() {
        return Err(CmdError::msg("empty filename"));
    }
    let path = PathBuf::from(filename);
    io::save_csv(ctx.table()?, &path)?;
    let session = ctx.session()?;
    session.filename = Some(path);
    session.dirty = false;
    Ok(CmdResult::msg(format!("saved: {}", filename)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Values;

    fn app() -> App {
        let mut table = Table::new();
        table
            .add_column(Values::Int(vec![1, 2, 3]), "a", None)
            .unwrap();
        table
            .add_column(Values::strings(["x", "y", "z"]), "b", None)
            .unwrap();
        let view = ViewState::new(&table);
        App::new(table, view, None)
    }

    fn no_input(_: &str) -> Result<String, Aborted> {
        panic!("unexpected prompt")
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut commands = CommandTable::with_defaults();
        let dup = Command::new("undo", &[], &[], |_, _| Ok(CmdResult::default()));
        assert!(commands.register(dup).is_err());
    }

    #[test]
    fn test_unknown_command() {
        let commands = CommandTable::with_defaults();
        let mut app = app();
        let outcome = commands.execute("frobnicate", &mut app, &mut no_input);
        assert!(matches!(
            outcome,
            CmdOutcome::Failed(CmdError::UnknownCommand(name)) if name == "frobnicate"
        ));
    }

    #[test]
    fn test_delete_and_undo() {
        let commands = CommandTable::with_defaults();
        let mut app = app();
        app.view.move_cursor_to(None, Some(2));
        assert!(matches!(
            commands.execute("delete-row", &mut app, &mut no_input),
            CmdOutcome::Done(_)
        ));
        assert_eq!(app.view.row_count(), 2);
        assert_eq!(app.view.cursor().row, 1);
        assert!(app.session.dirty);

        commands.execute("undo", &mut app, &mut no_input);
        assert_eq!(app.view.row_count(), 3);
        match commands.execute("undo", &mut app, &mut no_input) {
            CmdOutcome::Failed(err) => assert_eq!(err.to_string(), "nothing to undo"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_prompt_abort_runs_nothing() {
        let commands = CommandTable::with_defaults();
        let mut app = app();
        let outcome = commands.execute("rename-column", &mut app, &mut |_| Err(Aborted));
        assert!(matches!(outcome, CmdOutcome::Aborted));
        assert_eq!(app.table.get_column(app.view.cursor_column_id()).unwrap().name(), "a");
    }

    #[test]
    fn test_command_prompts_for_name() {
        let commands = CommandTable::with_defaults();
        let mut app = app();
        let mut answers = vec!["move-right".to_string()].into_iter();
        let outcome = commands.execute("command", &mut app, &mut |_| {
            answers.next().ok_or(Aborted)
        });
        assert!(matches!(outcome, CmdOutcome::Done(_)));
        assert_eq!(app.view.cursor().column, 1);
    }

    #[test]
    fn test_hide_last_visible_column_fails() {
        let commands = CommandTable::with_defaults();
        let mut app = app();
        commands.execute("hide-column", &mut app, &mut no_input);
        match commands.execute("hide-column", &mut app, &mut no_input) {
            CmdOutcome::Failed(err) => {
                assert_eq!(err.to_string(), "cannot hide last visible column")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(app.view.columns().visible_count(), 1);
    }

    #[test]
    fn test_go_to_row_rejects_text() {
        let commands = CommandTable::with_defaults();
        let mut app = app();
        let outcome = commands.execute("go-to-row", &mut app, &mut |_| Ok("two".to_string()));
        assert!(matches!(outcome, CmdOutcome::Failed(_)));
        let outcome = commands.execute("go-to-row", &mut app, &mut |_| Ok("2".to_string()));
        assert!(matches!(outcome, CmdOutcome::Done(_)));
        assert_eq!(app.view.cursor().row, 2);
    }

    #[test]
    fn test_quit_sets_flag() {
        let commands = CommandTable::with_defaults();
        let mut app = app();
        commands.execute("quit", &mut app, &mut no_input);
        assert!(app.session.quit);
    }
}

//! Mapping from keys and key combos to command names.
//!
//! Keys are named as by [`crate::handlers::key_name`]: `"q"`, `"LEFT"`,
//! `"S-LEFT"`, `"C-x"`, `"M-x"`. A combo is a sequence of keys; every
//! proper prefix of a combo must itself be bound as [`Binding::Prefix`].

use std::collections::HashMap;

use tracing::debug;

use crate::commands::CommandTable;
use crate::error::KeymapError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    Command(String),
    /// Waits for more keys.
    Prefix,
}

#[derive(Clone, Debug, Default)]
pub struct KeyMap {
    bindings: HashMap<Vec<String>, Binding>,
}

impl KeyMap {
    /// Builds a key map, checking that every combo's prefixes are bound as
    /// prefixes.
    pub fn new<I, C, K>(entries: I) -> Result<Self, KeymapError>
    where
        I: IntoIterator<Item = (C, Binding)>,
        C: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let bindings: HashMap<Vec<String>, Binding> = entries
            .into_iter()
            .map(|(combo, binding)| (combo.into_iter().map(Into::into).collect(), binding))
            .collect();

        for combo in bindings.keys().filter(|c| c.len() > 1) {
            for len in 1..combo.len() {
                let prefix = &combo[..len];
                if bindings.get(prefix) != Some(&Binding::Prefix) {
                    return Err(KeymapError::MissingPrefix {
                        combo: combo.join(" "),
                        prefix: prefix.join(" "),
                    });
                }
            }
        }
        Ok(Self { bindings })
    }

    /// Checks that every bound command exists.
    pub fn validate(&self, commands: &CommandTable) -> Result<(), KeymapError> {
        for binding in self.bindings.values() {
            if let Binding::Command(name) = binding {
                if !commands.contains(name) {
                    return Err(KeymapError::UnknownCommand(name.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn lookup(&self, combo: &[String]) -> Option<&Binding> {
        self.bindings.get(combo)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// The built-in key bindings.
pub fn default_keymap() -> KeyMap {
    let cmd = |name: &str| Binding::Command(name.to_string());
    let entries: Vec<(Vec<&str>, Binding)> = vec![
        (vec!["LEFT"], cmd("move-left")),
        (vec!["RIGHT"], cmd("move-right")),
        (vec!["UP"], cmd("move-up")),
        (vec!["DOWN"], cmd("move-down")),
        (vec!["S-LEFT"], cmd("scroll-left")),
        (vec!["S-RIGHT"], cmd("scroll-right")),
        (vec!["S-UP"], cmd("scroll-up")),
        (vec!["S-DOWN"], cmd("scroll-down")),
        (vec!["PAGEUP"], cmd("page-up")),
        (vec!["PAGEDOWN"], cmd("page-down")),
        (vec!["HOME"], cmd("move-to-first-row")),
        (vec!["END"], cmd("move-to-last-row")),
        (vec!["C-b"], cmd("move-left")),
        (vec!["C-f"], cmd("move-right")),
        (vec!["C-p"], cmd("move-up")),
        (vec!["C-n"], cmd("move-down")),
        (vec!["C-k"], cmd("delete-row")),
        (vec!["C-z"], cmd("undo")),
        (vec!["C-x"], Binding::Prefix),
        (vec!["C-x", "C-s"], cmd("save")),
        (vec!["C-x", "C-w"], cmd("save-as")),
        (vec!["C-x", "C-c"], cmd("quit")),
        (vec!["M-#"], cmd("toggle-show-row-num")),
        (vec!["M-h"], cmd("toggle-show-header")),
        (vec!["M-g"], cmd("go-to-row")),
        (vec!["M-r"], cmd("rename-column")),
        (vec!["M-x"], cmd("command")),
        (vec!["H"], cmd("hide-column")),
        (vec!["S"], cmd("show-all-columns")),
        (vec!["<"], cmd("move-column-left")),
        (vec![">"], cmd("move-column-right")),
        (vec!["+"], cmd("increase-column-width")),
        (vec!["-"], cmd("decrease-column-width")),
        (vec!["]"], cmd("increase-column-precision")),
        (vec!["["], cmd("decrease-column-precision")),
        (vec!["q"], cmd("quit")),
    ];
    match KeyMap::new(entries) {
        Ok(keymap) => keymap,
        Err(err) => panic!("default key map: {}", err),
    }
}

/// What a key completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyResult<'a> {
    Command(&'a str),
    /// A prefix; keys so far are returned for display.
    Pending(String),
    /// No binding; the combo is discarded.
    Unbound(String),
}

/// Collects prefix keys until a combo resolves.
#[derive(Clone, Debug, Default)]
pub struct ComboReader {
    pending: Vec<String>,
}

impl ComboReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn feed<'k>(&mut self, keymap: &'k KeyMap, key: &str) -> KeyResult<'k> {
        self.pending.push(key.to_string());
        match keymap.lookup(&self.pending) {
            Some(Binding::Prefix) => KeyResult::Pending(format!("{} ...", self.pending.join(" "))),
            Some(Binding::Command(name)) => {
                debug!(combo = %self.pending.join(" "), command = %name, "combo");
                self.pending.clear();
                KeyResult::Command(name)
            }
            None => {
                let combo = self.pending.join(" ");
                debug!(%combo, "unknown combo");
                self.pending.clear();
                KeyResult::Unbound(combo)
            }
        }
    }
}

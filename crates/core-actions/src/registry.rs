//! Command registration and key mappings.
//!
//! Commands are registered per mode under a `<Plug>` name; key mappings bind a
//! typed sequence to such a name. Keeping the two apart mirrors how the
//! surround commands reach users: `cs` and `ds` are ordinary mappings onto
//! `<Plug>CSurround` and `<Plug>DSurround`, so a host can register the
//! commands without claiming the keys.

use crate::operator::{Operator, SurroundChange, SurroundDelete};
use core_config::NotFoundPolicy;
use core_keymap::{MappingSpec, MappingTrie, baseline_normal_specs, plug_name};
use core_state::Mode;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Builds a fresh operator instance for every command invocation.
pub type OperatorFactory = Box<dyn Fn() -> Box<dyn Operator>>;

pub struct CommandRegistry {
    commands: HashMap<(Mode, String), OperatorFactory>,
    mappings: HashMap<Mode, Vec<MappingSpec>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Registry seeded with the baseline Normal mode mappings (`<Esc>` cancel).
    pub fn new() -> Self {
        let mut mappings = HashMap::new();
        mappings.insert(Mode::Normal, baseline_normal_specs());
        Self {
            commands: HashMap::new(),
            mappings,
        }
    }

    /// Register `factory` under `name` for `mode`. `name` may carry the `<Plug>` prefix.
    pub fn register(&mut self, mode: Mode, name: &str, factory: OperatorFactory) {
        let name = plug_name(name).unwrap_or(name).to_string();
        debug!(target: "actions.registry", ?mode, command = %name, "command_registered");
        if self.commands.insert((mode, name.clone()), factory).is_some() {
            warn!(target: "actions.registry", ?mode, command = %name, "command_replaced");
        }
    }

    /// Map `lhs` to `rhs` (`<Plug>Name`) in `mode`. Returns false when `rhs` is not a plug name.
    pub fn add_mapping(&mut self, mode: Mode, lhs: &str, rhs: &str) -> bool {
        let Some(spec) = MappingSpec::plug(lhs, rhs) else {
            warn!(target: "actions.registry", ?mode, lhs, rhs, "mapping_rejected");
            return false;
        };
        debug!(target: "actions.registry", ?mode, lhs, rhs, "mapping_added");
        self.mappings.entry(mode).or_default().push(spec);
        true
    }

    pub fn contains(&self, mode: Mode, name: &str) -> bool {
        let name = plug_name(name).unwrap_or(name);
        self.commands.contains_key(&(mode, name.to_string()))
    }

    /// Fresh operator for the command registered as `name` in `mode`.
    pub fn instantiate(&self, mode: Mode, name: &str) -> Option<Box<dyn Operator>> {
        let name = plug_name(name).unwrap_or(name);
        self.commands
            .get(&(mode, name.to_string()))
            .map(|factory| factory())
    }

    /// Compile the mappings of `mode` into a resolution trie.
    pub fn trie(&self, mode: Mode) -> MappingTrie {
        MappingTrie::build(self.mappings.get(&mode).cloned().unwrap_or_default())
    }
}

/// The surround commands with their `<Plug>` names, unregistered.
pub fn surround_commands(policy: NotFoundPolicy) -> [(&'static str, OperatorFactory); 2] {
    let change: OperatorFactory =
        Box::new(move || -> Box<dyn Operator> { Box::new(SurroundChange::new(policy)) });
    let delete: OperatorFactory =
        Box::new(move || -> Box<dyn Operator> { Box::new(SurroundDelete::new(policy)) });
    [(SurroundChange::NAME, change), (SurroundDelete::NAME, delete)]
}

/// Register the surround commands in Normal mode and map `cs` / `ds` onto them.
pub fn register_surround(registry: &mut CommandRegistry, policy: NotFoundPolicy) {
    for (name, factory) in surround_commands(policy) {
        registry.register(Mode::Normal, name, factory);
    }
    registry.add_mapping(Mode::Normal, "cs", "<Plug>CSurround");
    registry.add_mapping(Mode::Normal, "ds", "<Plug>DSurround");
}

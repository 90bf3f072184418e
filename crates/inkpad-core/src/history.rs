//! Undo/redo log of scene mutations.
//!
//! Commands are plain values holding drawable IDs and recorded offsets. Replaying
//! a command never re-derives geometry from the current scene, so alternating
//! undo and redo any number of times lands on the same coordinates.

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::scene::Scene;
use crate::shapes::DrawableId;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// One reversible scene mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// A finished ink stroke was added.
    AddStroke(DrawableId),
    /// An image was embedded.
    AddImage(DrawableId),
    /// Trim-eraser masks added by one gesture.
    AddMask(Vec<DrawableId>),
    /// An object was erased.
    RemoveObject(DrawableId),
    /// A lasso selection was dragged by `delta`.
    Translate {
        /// Each moved object with its origin before the drag.
        moves: Vec<(DrawableId, Vec2)>,
        delta: Vec2,
    },
}

impl Command {
    pub fn references(&self, id: DrawableId) -> bool {
        match self {
            Command::AddStroke(own) | Command::AddImage(own) | Command::RemoveObject(own) => {
                *own == id
            }
            Command::AddMask(ids) => ids.contains(&id),
            Command::Translate { moves, .. } => moves.iter().any(|(own, _)| *own == id),
        }
    }

    /// Revert the command's effect on `scene`.
    pub fn undo(&self, scene: &mut Scene) {
        match self {
            Command::AddStroke(id) | Command::AddImage(id) => detach(scene, *id),
            Command::AddMask(ids) => ids.iter().for_each(|id| detach(scene, *id)),
            Command::RemoveObject(id) => attach(scene, *id),
            Command::Translate { moves, .. } => {
                for (id, before) in moves {
                    place(scene, *id, *before);
                }
            }
        }
    }

    /// Re-apply the command's effect on `scene`.
    pub fn redo(&self, scene: &mut Scene) {
        match self {
            Command::AddStroke(id) | Command::AddImage(id) => attach(scene, *id),
            Command::AddMask(ids) => ids.iter().for_each(|id| attach(scene, *id)),
            Command::RemoveObject(id) => detach(scene, *id),
            Command::Translate { moves, delta } => {
                for (id, before) in moves {
                    place(scene, *id, *before + *delta);
                }
            }
        }
    }
}

fn detach(scene: &mut Scene, id: DrawableId) {
    if !scene.contains(id) {
        log::error!("History refers to unknown drawable {id}");
        return;
    }
    scene.detach(id);
}

fn attach(scene: &mut Scene, id: DrawableId) {
    if !scene.contains(id) {
        log::error!("History refers to unknown drawable {id}");
        return;
    }
    scene.attach(id);
}

fn place(scene: &mut Scene, id: DrawableId, origin: Vec2) {
    if !scene.place(id, origin) {
        log::error!("History refers to unknown drawable {id}");
    }
}

/// Linear undo/redo stacks with a depth limit.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    /// Commands that can be undone, oldest first.
    done: Vec<Command>,
    /// Commands that can be redone, most recently undone last.
    undone: Vec<Command>,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `limit` undoable commands.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            done: Vec::new(),
            undone: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record a command that has already been applied. Clears the redo stack.
    pub fn push(&mut self, command: Command) {
        log::debug!("Recording {command:?}");
        self.done.push(command);
        self.undone.clear();

        if self.done.len() > self.limit {
            let dropped = self.done.len() - self.limit;
            self.done.drain(..dropped);
        }
    }

    /// Undo the last command. Returns false if there was nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(command) = self.done.pop() else {
            return false;
        };
        command.undo(scene);
        self.undone.push(command);
        true
    }

    /// Redo the last undone command. Returns false if there was nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(command) = self.undone.pop() else {
            return false;
        };
        command.redo(scene);
        self.done.push(command);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Depth of the undo stack.
    pub fn undo_len(&self) -> usize {
        self.done.len()
    }

    /// Depth of the redo stack.
    pub fn redo_len(&self) -> usize {
        self.undone.len()
    }

    /// Most recent undoable command.
    pub fn last(&self) -> Option<&Command> {
        self.done.last()
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    /// Whether any command on either stack refers to `id`.
    pub fn references(&self, id: DrawableId) -> bool {
        self.done
            .iter()
            .chain(self.undone.iter())
            .any(|command| command.references(id))
    }
}

//! Kanban board for one project.
//!
//! Cards are grouped into one column per [`TaskStatus`]. The order of cards
//! inside a column is local presentation state: it is never sent to the
//! server, and a refetch rebuilds it from the server's order.
//!
//! A drag ends in one of three ways (see [`DragOutcome`]). Only a move across
//! columns produces a request, and it produces exactly one. The column change
//! is shown immediately and then confirmed or reverted by [`Board::commit_move`].

use taskboard_core::contract::UpdateTaskRequest;
use taskboard_core::models::Task;
use taskboard_core::status::TaskStatus;
use taskboard_core::types::DbId;
use taskboard_core::workflow::{StatusChange, TransitionTable};

use crate::api::ApiClient;
use crate::cache::{QueryCache, QueryKey};
use crate::error::ClientError;

/// What a card was dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty space in a column.
    Column(TaskStatus),
    /// Another card; the target column is that card's column.
    Card(DbId),
}

/// An optimistic column move waiting for the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub change: StatusChange,
    /// Where the card sat in its original column, for reverting.
    pub previous_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Dropped nowhere, on itself, or on something unknown.
    NoChange,
    /// Moved within its column. Local only.
    Reorder {
        status: TaskStatus,
        from: usize,
        to: usize,
    },
    /// Moved to another column. Shown already; pass to [`Board::commit_move`].
    Move(PendingMove),
}

#[derive(Debug, Clone)]
pub struct Board {
    project_id: DbId,
    columns: [Vec<Task>; TaskStatus::COUNT],
    transitions: TransitionTable,
}

impl Board {
    pub fn new(project_id: DbId, tasks: Vec<Task>) -> Self {
        Self::with_transitions(project_id, tasks, TransitionTable::default())
    }

    pub fn with_transitions(
        project_id: DbId,
        tasks: Vec<Task>,
        transitions: TransitionTable,
    ) -> Self {
        let mut board = Self {
            project_id,
            columns: Default::default(),
            transitions,
        };
        board.reset(tasks);
        board
    }

    pub fn project_id(&self) -> DbId {
        self.project_id
    }

    /// Replace every card with the server's list. Cards of other projects
    /// are ignored.
    pub fn reset(&mut self, tasks: Vec<Task>) {
        for column in &mut self.columns {
            column.clear();
        }
        for task in tasks {
            if task.project_id == self.project_id {
                self.columns[task.status.ordinal()].push(task);
            }
        }
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        &self.columns[status.ordinal()]
    }

    /// Column and index of a card.
    pub fn position(&self, task_id: DbId) -> Option<(TaskStatus, usize)> {
        TaskStatus::ALL.iter().find_map(|&status| {
            self.column(status)
                .iter()
                .position(|t| t.id == task_id)
                .map(|index| (status, index))
        })
    }

    pub fn task(&self, task_id: DbId) -> Option<&Task> {
        let (status, index) = self.position(task_id)?;
        self.column(status).get(index)
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a drop.
    ///
    /// A cross-column drop is checked against the transition table; a move
    /// the table forbids returns an error and leaves the board untouched.
    pub fn drag_end(
        &mut self,
        active: DbId,
        over: Option<DropTarget>,
    ) -> Result<DragOutcome, ClientError> {
        let Some(over) = over else {
            return Ok(DragOutcome::NoChange);
        };
        let Some((from, from_index)) = self.position(active) else {
            return Ok(DragOutcome::NoChange);
        };

        let (to, to_index) = match over {
            DropTarget::Column(status) => (status, None),
            DropTarget::Card(card) if card == active => return Ok(DragOutcome::NoChange),
            DropTarget::Card(card) => match self.position(card) {
                Some((status, index)) => (status, Some(index)),
                None => return Ok(DragOutcome::NoChange),
            },
        };

        let Some(change) = StatusChange::plan(&self.transitions, active, from, to)? else {
            return Ok(self.reorder(from, from_index, to_index));
        };

        let mut task = self.columns[from.ordinal()].remove(from_index);
        task.status = to;
        let column = &mut self.columns[to.ordinal()];
        let index = to_index.unwrap_or(column.len()).min(column.len());
        column.insert(index, task);

        tracing::debug!(task_id = active, %from, %to, "Optimistic column move");
        Ok(DragOutcome::Move(PendingMove {
            change,
            previous_index: from_index,
        }))
    }

    fn reorder(&mut self, status: TaskStatus, from: usize, to: Option<usize>) -> DragOutcome {
        let Some(to) = to else {
            return DragOutcome::NoChange;
        };
        if to == from {
            return DragOutcome::NoChange;
        }
        let column = &mut self.columns[status.ordinal()];
        let task = column.remove(from);
        column.insert(to, task);
        DragOutcome::Reorder { status, from, to }
    }

    /// Send the one status update for a pending move and reconcile.
    ///
    /// On success the card is replaced by the server's copy. On failure the
    /// card goes back to its previous column and position, and the project's
    /// tasks are refetched so the board matches the server again. Either way
    /// the task lists and this project's cached view are invalidated. The
    /// request error is returned for display.
    pub async fn commit_move(
        &mut self,
        api: &ApiClient,
        cache: &mut QueryCache,
        pending: PendingMove,
    ) -> Result<Task, ClientError> {
        let StatusChange { task_id, from, to } = pending.change;
        let result = api
            .update_task(task_id, &UpdateTaskRequest::status(to))
            .await;

        cache.invalidate(QueryKey::Tasks(Some(self.project_id)));
        cache.invalidate(QueryKey::Project(self.project_id));

        match result {
            Ok(task) => {
                self.replace(task.clone());
                Ok(task)
            }
            Err(err) => {
                tracing::warn!(task_id, %from, %to, error = %err, "Status update failed, reverting");
                self.move_card(task_id, from, Some(pending.previous_index));
                match api.list_tasks(Some(self.project_id)).await {
                    Ok(tasks) => {
                        cache.put_tasks(Some(self.project_id), tasks.clone());
                        self.reset(tasks);
                    }
                    Err(refetch) => {
                        tracing::warn!(error = %refetch, "Refetch after failed move also failed");
                    }
                }
                Err(err)
            }
        }
    }

    /// Put the server's copy of a card in place, moving it if its status
    /// differs from the column it is shown in.
    pub fn replace(&mut self, task: Task) {
        match self.position(task.id) {
            Some((status, index)) if status == task.status => {
                self.columns[status.ordinal()][index] = task;
            }
            Some((status, index)) => {
                self.columns[status.ordinal()].remove(index);
                self.columns[task.status.ordinal()].push(task);
            }
            None if task.project_id == self.project_id => {
                self.columns[task.status.ordinal()].push(task);
            }
            None => {}
        }
    }

    fn move_card(&mut self, task_id: DbId, to: TaskStatus, index: Option<usize>) {
        let Some((status, current)) = self.position(task_id) else {
            return;
        };
        let mut task = self.columns[status.ordinal()].remove(current);
        task.status = to;
        let column = &mut self.columns[to.ordinal()];
        let index = index.unwrap_or(column.len()).min(column.len());
        column.insert(index, task);
    }
}

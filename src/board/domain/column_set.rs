//! Ordered column collection owned by a board.

use super::{BoardDomainError, Column, Task, TaskId};
use crate::user::domain::UserEmail;

/// Minimum number of columns a board keeps.
pub const MIN_COLUMNS: usize = 2;

/// Columns of one board, ordered by ordinal.
///
/// Ordinals always equal positions: every structural change ends with a
/// full renumbering pass. Ordinal 0 is the backlog where new tasks land and
/// the last ordinal is the terminal done column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    /// Creates a column set with one column per name, in order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnName`] when a name is empty or
    /// [`BoardDomainError::TooFewColumns`] when fewer than
    /// [`MIN_COLUMNS`] names are given.
    pub fn with_names<'a>(
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, BoardDomainError> {
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(ordinal, name)| Column::new(name, ordinal))
            .collect::<Result<Vec<_>, _>>()?;
        if columns.len() < MIN_COLUMNS {
            return Err(BoardDomainError::TooFewColumns(MIN_COLUMNS));
        }
        Ok(Self { columns })
    }

    /// Rebuilds a column set from persisted columns, ordering them by their
    /// stored ordinals.
    #[must_use]
    pub fn from_persisted(mut columns: Vec<Column>) -> Self {
        columns.sort_by_key(Column::ordinal);
        let mut set = Self { columns };
        set.renumber();
        set
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` when the set holds no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates the columns in ordinal order.
    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Returns the ordinal of the terminal column.
    #[must_use]
    pub fn done_ordinal(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Returns the column at `ordinal`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] outside `[0, len)`.
    pub fn column(&self, ordinal: usize) -> Result<&Column, BoardDomainError> {
        self.columns
            .get(ordinal)
            .ok_or(BoardDomainError::ColumnNotFound(ordinal))
    }

    /// Returns the column at `ordinal` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] outside `[0, len)`.
    pub fn column_mut(&mut self, ordinal: usize) -> Result<&mut Column, BoardDomainError> {
        self.columns
            .get_mut(ordinal)
            .ok_or(BoardDomainError::ColumnNotFound(ordinal))
    }

    /// Returns the backlog column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] if the set is empty.
    pub fn backlog(&self) -> Result<&Column, BoardDomainError> {
        self.column(0)
    }

    /// Returns the ordinal of the column holding the task.
    #[must_use]
    pub fn locate_task(&self, id: TaskId) -> Option<usize> {
        self.columns.iter().position(|column| column.contains(id))
    }

    /// Inserts a new empty column at `ordinal`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InsertOutOfRange`] when `ordinal` exceeds
    /// the column count, or [`BoardDomainError::EmptyColumnName`].
    pub fn add_column(
        &mut self,
        ordinal: usize,
        name: impl Into<String>,
    ) -> Result<(), BoardDomainError> {
        let count = self.len();
        if ordinal > count {
            return Err(BoardDomainError::InsertOutOfRange { ordinal, count });
        }
        let column = Column::new(name, ordinal)?;
        self.columns.insert(ordinal, column);
        self.renumber();
        Ok(())
    }

    /// Renames the column at `ordinal`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnNotFound`] or
    /// [`BoardDomainError::EmptyColumnName`].
    pub fn rename_column(
        &mut self,
        ordinal: usize,
        name: impl Into<String>,
    ) -> Result<(), BoardDomainError> {
        self.column_mut(ordinal)?.rename(name)
    }

    /// Moves the empty column at `ordinal` by `shift` positions.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ZeroShift`], then
    /// [`BoardDomainError::ShiftOutOfRange`] when the target is outside the
    /// set, then [`BoardDomainError::ColumnNotFound`] or
    /// [`BoardDomainError::ColumnNotEmpty`] for the source.
    pub fn move_column(&mut self, ordinal: usize, shift: isize) -> Result<(), BoardDomainError> {
        if shift == 0 {
            return Err(BoardDomainError::ZeroShift);
        }
        let target = ordinal
            .checked_add_signed(shift)
            .filter(|target| *target < self.len())
            .ok_or(BoardDomainError::ShiftOutOfRange { ordinal, shift })?;
        if !self.column(ordinal)?.is_empty() {
            return Err(BoardDomainError::ColumnNotEmpty(ordinal));
        }

        let column = self.columns.remove(ordinal);
        self.columns.insert(target, column);
        self.renumber();
        Ok(())
    }

    /// Removes the column at `ordinal`, merging its tasks into a neighbour.
    ///
    /// The backlog merges forward into ordinal 1; every other column merges
    /// backward into `ordinal - 1`. A failed merge leaves the set unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::TooFewColumns`] at the floor,
    /// [`BoardDomainError::ColumnNotFound`], or
    /// [`BoardDomainError::LimitReached`] when the neighbour cannot take the
    /// tasks.
    pub fn remove_column(&mut self, ordinal: usize) -> Result<(), BoardDomainError> {
        if self.len() <= MIN_COLUMNS {
            return Err(BoardDomainError::TooFewColumns(MIN_COLUMNS));
        }
        self.column(ordinal)?;

        let mut removed = self.columns.remove(ordinal);
        // After the removal the forward neighbour of the backlog sits at 0.
        let target = if ordinal == 0 { 0 } else { ordinal - 1 };
        let merged = self
            .column_mut(target)
            .and_then(|neighbour| neighbour.consume(&mut removed));
        if let Err(err) = merged {
            self.columns.insert(ordinal, removed);
            return Err(err);
        }
        self.renumber();
        Ok(())
    }

    /// Returns tasks assigned to `email` in the columns strictly between the
    /// backlog and the done column.
    #[must_use]
    pub fn assignee_tasks(&self, email: &UserEmail) -> Vec<&Task> {
        let done = self.done_ordinal();
        self.columns
            .iter()
            .filter(|column| column.ordinal() > 0 && column.ordinal() < done)
            .flat_map(|column| column.assignee_tasks(email))
            .collect()
    }

    fn renumber(&mut self) {
        for (ordinal, column) in self.columns.iter_mut().enumerate() {
            column.set_ordinal(ordinal);
        }
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Diesel schema for board persistence.

diesel::table! {
    /// Board headers.
    boards (id) {
        /// Board identifier.
        id -> Uuid,
        /// Board name, unique per creator.
        #[max_length = 255]
        name -> Varchar,
        /// Creator email.
        #[max_length = 320]
        creator -> Varchar,
    }
}

diesel::table! {
    /// Board membership in join order.
    board_members (board_id, position) {
        /// Owning board.
        board_id -> Uuid,
        /// Join order.
        position -> Int4,
        /// Member email.
        #[max_length = 320]
        email -> Varchar,
    }
}

diesel::table! {
    /// Board columns.
    board_columns (id) {
        /// Column identifier.
        id -> Uuid,
        /// Owning board.
        board_id -> Uuid,
        /// Column name.
        #[max_length = 255]
        name -> Varchar,
        /// Position within the board.
        ordinal -> Int4,
        /// Work limit, null when unlimited.
        task_limit -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Tasks held by board columns.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning board.
        board_id -> Uuid,
        /// Column holding the task.
        column_id -> Uuid,
        /// Insertion order within the column.
        position -> Int4,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Assignee email.
        #[max_length = 320]
        assignee -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Due date.
        due -> Timestamptz,
    }
}

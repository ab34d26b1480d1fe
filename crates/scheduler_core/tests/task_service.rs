use scheduler_core::db::open_db_in_memory;
use scheduler_core::{
    CalendarDate, RecurrenceError, RecurrenceRule, SqliteTaskRepository, TaskDraft, TaskService,
    TaskServiceError, TaskValidationError,
};

fn today() -> CalendarDate {
    CalendarDate::parse("20240301").unwrap()
}

fn draft(date: &str, title: &str, repeat: &str) -> TaskDraft {
    TaskDraft {
        date: date.to_string(),
        title: title.to_string(),
        comment: String::new(),
        repeat: repeat.to_string(),
    }
}

#[test]
fn create_normalizes_dates_per_policy() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let cases = [
        ("", "y", "20240301"),
        ("20230301", "y", "20250301"),
        ("20240101", "d 7", "20240304"),
        ("20240315", "d 7", "20240315"),
        ("20231231", "", "20240301"),
        ("20240115", "w 1,3,5", "20240302"),
    ];

    for (input, repeat, expected) in cases {
        let id = service
            .create_task(today(), &draft(input, "task", repeat))
            .unwrap();
        let stored = service.get_task(id).unwrap().unwrap();
        assert_eq!(
            stored.date.to_string(),
            expected,
            "input `{input}` repeat `{repeat}`"
        );
    }
}

#[test]
fn create_rejects_invalid_input_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let err = service
        .create_task(today(), &draft("20240101", "", "y"))
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Validation(TaskValidationError::EmptyTitle)
    ));

    let err = service
        .create_task(today(), &draft("01/03/2024", "task", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Recurrence(RecurrenceError::InvalidDateFormat { .. })
    ));

    let err = service
        .create_task(today(), &draft("20240101", "task", "d 500"))
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Recurrence(RecurrenceError::InvalidRepeatCount { .. })
    ));

    // Rule text is checked even when the date needs no recurrence.
    let err = service
        .create_task(today(), &draft("20250101", "task", "every monday"))
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Recurrence(RecurrenceError::UnsupportedRule { .. })
    ));

    assert!(service.list_tasks(None).unwrap().is_empty());
}

#[test]
fn update_applies_same_policy_and_returns_stored_task() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let id = service
        .create_task(today(), &draft("20240320", "report", ""))
        .unwrap();
    let updated = service
        .update_task(today(), id, &draft("20230301", "yearly report", "y"))
        .unwrap();

    assert_eq!(updated.date.to_string(), "20250301");
    assert_eq!(updated.repeat, RecurrenceRule::Yearly);
    assert_eq!(service.get_task(id).unwrap().unwrap(), updated);
}

#[test]
fn update_is_idempotent_for_normalized_dates() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let id = service
        .create_task(today(), &draft("20240101", "stretch", "d 7"))
        .unwrap();
    let first = service.get_task(id).unwrap().unwrap();
    let again = service
        .update_task(
            today(),
            id,
            &draft(&first.date.to_string(), "stretch", &first.repeat.to_string()),
        )
        .unwrap();
    assert_eq!(again, first);
}

#[test]
fn update_missing_or_invalid_id_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let err = service
        .update_task(today(), 77, &draft("20240320", "ghost", ""))
        .unwrap_err();
    assert!(matches!(err, TaskServiceError::TaskNotFound(77)));

    let err = service
        .update_task(today(), 0, &draft("20240320", "ghost", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Validation(TaskValidationError::InvalidId(0))
    ));
}

#[test]
fn list_returns_tasks_by_date() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    service
        .create_task(today(), &draft("20240901", "autumn", ""))
        .unwrap();
    service
        .create_task(today(), &draft("20240401", "spring", ""))
        .unwrap();

    let titles = service
        .list_tasks(Some(10))
        .unwrap()
        .into_iter()
        .map(|task| task.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["spring", "autumn"]);
}

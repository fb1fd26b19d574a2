//! Exam command implementation

use anyhow::Result;

use super::{finish, CliContext};

/// Set or clear the target exam
pub fn exam_command(ctx: &CliContext, exam: Option<String>) -> Result<()> {
    let mut store = ctx.open_store();
    store.set_target_exam(exam);

    match &store.state().target_exam {
        Some(exam) => println!("Target exam: {}", exam),
        None => println!("Target exam cleared"),
    }
    finish(store);
    Ok(())
}

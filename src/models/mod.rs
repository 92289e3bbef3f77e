mod task;

pub use task::{CreateTaskRequest, NewTask, Subtask, Task, UpdateTaskRequest};

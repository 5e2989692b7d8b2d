use std::collections::HashSet;

use log::{debug, warn};
use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{NewTask, Task, TaskId, TaskPatch};

use super::guard::Protected;
use super::Effect;
use crate::api::{Api, ApiError};
use crate::route::Route;

const DELETE_PROMPT: &str = "Delete this task?";

#[derive(Debug, Clone)]
pub enum Msg {
    Loaded(Result<Vec<Task>, ApiError>),
    SetNewTitle(String),
    SetNewDescription(String),
    Create,
    Created(Result<Task, ApiError>),
    StartEdit(TaskId),
    SetEditTitle(String),
    SetEditDescription(String),
    SaveEdit,
    CancelEdit,
    Saved(TaskId, Result<Task, ApiError>),
    ToggleCompleted(TaskId),
    Toggled(TaskId, Result<Task, ApiError>),
    Delete(TaskId),
    ConfirmDelete(TaskId),
    Deleted(TaskId, Result<(), ApiError>),
    Logout,
    LoggedOut,
    GoTo(Route),
}

/// Fields of the task being edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    pub id: TaskId,
    pub title: String,
    pub description: String,
}

pub struct TasksPage {
    api: Api,
    /// Working list, mirrors the server in server order.
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub new_title: String,
    pub new_description: String,
    pub creating: bool,
    pub editing: Option<EditBuffer>,
    /// Tasks with a request in flight; their controls are disabled.
    busy: HashSet<TaskId>,
    logging_out: bool,
}

impl Protected for TasksPage {
    type Msg = Msg;

    fn on_session(&mut self) -> Effect<Msg> {
        self.loading = true;
        let api = self.api.clone();
        Effect::perform(async move { Msg::Loaded(api.list_tasks().await) })
    }
}

impl TasksPage {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            loading: false,
            error: None,
            new_title: String::new(),
            new_description: String::new(),
            creating: false,
            editing: None,
            busy: HashSet::new(),
            logging_out: false,
        }
    }

    pub fn is_busy(&self, id: TaskId) -> bool {
        self.busy.contains(&id)
    }

    fn replace(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => debug!("task {} no longer in the list, dropping update", task.id),
        }
    }

    pub fn update(&mut self, msg: Msg) -> Effect<Msg> {
        match msg {
            Msg::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok(tasks) => {
                        debug!("loaded {} tasks", tasks.len());
                        self.tasks = tasks;
                    }
                    Err(err) => {
                        warn!("task load failed: {err}");
                        self.error = Some("Failed to load tasks".into());
                    }
                }
                Effect::None
            }
            Msg::SetNewTitle(title) => {
                self.new_title = title;
                Effect::None
            }
            Msg::SetNewDescription(description) => {
                self.new_description = description;
                Effect::None
            }
            Msg::Create => {
                if self.new_title.trim().is_empty() {
                    self.error = Some("Title is required".into());
                    return Effect::None;
                }
                if self.creating {
                    return Effect::None;
                }
                self.creating = true;
                let api = self.api.clone();
                let task = NewTask::new(self.new_title.clone(), &self.new_description);
                Effect::perform(async move { Msg::Created(api.create_task(&task).await) })
            }
            Msg::Created(result) => {
                self.creating = false;
                match result {
                    Ok(task) => {
                        self.tasks.push(task);
                        self.new_title.clear();
                        self.new_description.clear();
                        self.error = None;
                    }
                    Err(err) => {
                        warn!("task create failed: {err}");
                        self.error = Some("Failed to add task".into());
                    }
                }
                Effect::None
            }
            Msg::StartEdit(id) => {
                if let Some(task) = self.tasks.iter().find(|t| t.id == id) {
                    self.editing = Some(EditBuffer {
                        id,
                        title: task.title.clone(),
                        description: task.description().unwrap_or_default().to_string(),
                    });
                }
                Effect::None
            }
            Msg::SetEditTitle(title) => {
                if let Some(buffer) = self.editing.as_mut() {
                    buffer.title = title;
                }
                Effect::None
            }
            Msg::SetEditDescription(description) => {
                if let Some(buffer) = self.editing.as_mut() {
                    buffer.description = description;
                }
                Effect::None
            }
            Msg::SaveEdit => {
                let Some(buffer) = self.editing.clone() else {
                    return Effect::None;
                };
                if buffer.title.trim().is_empty() {
                    self.error = Some("Title is required".into());
                    return Effect::None;
                }
                if !self.busy.insert(buffer.id) {
                    return Effect::None;
                }
                let api = self.api.clone();
                let patch = TaskPatch::edit(buffer.title, &buffer.description);
                let id = buffer.id;
                Effect::perform(async move { Msg::Saved(id, api.update_task(id, &patch).await) })
            }
            Msg::CancelEdit => {
                self.editing = None;
                Effect::None
            }
            Msg::Saved(id, result) => {
                self.busy.remove(&id);
                match result {
                    Ok(task) => {
                        self.replace(task);
                        if self.editing.as_ref().is_some_and(|b| b.id == id) {
                            self.editing = None;
                        }
                        self.error = None;
                    }
                    Err(err) => {
                        warn!("task {id} update failed: {err}");
                        self.error = Some("Failed to update task".into());
                    }
                }
                Effect::None
            }
            Msg::ToggleCompleted(id) => {
                let Some(flipped) = self.tasks.iter().find(|t| t.id == id).map(|t| !t.is_completed)
                else {
                    return Effect::None;
                };
                if !self.busy.insert(id) {
                    return Effect::None;
                }
                let api = self.api.clone();
                let patch = TaskPatch::completion(flipped);
                Effect::perform(async move { Msg::Toggled(id, api.update_task(id, &patch).await) })
            }
            Msg::Toggled(id, result) => {
                self.busy.remove(&id);
                match result {
                    Ok(task) => {
                        self.replace(task);
                        self.error = None;
                    }
                    Err(err) => {
                        warn!("task {id} toggle failed: {err}");
                        self.error = Some("Failed to update task".into());
                    }
                }
                Effect::None
            }
            Msg::Delete(id) => Effect::Confirm {
                prompt: DELETE_PROMPT.to_string(),
                on_confirm: Msg::ConfirmDelete(id),
            },
            Msg::ConfirmDelete(id) => {
                if !self.busy.insert(id) {
                    return Effect::None;
                }
                let api = self.api.clone();
                Effect::perform(async move { Msg::Deleted(id, api.delete_task(id).await) })
            }
            Msg::Deleted(id, result) => {
                self.busy.remove(&id);
                match result {
                    Ok(()) => {
                        self.tasks.retain(|t| t.id != id);
                        if self.editing.as_ref().is_some_and(|b| b.id == id) {
                            self.editing = None;
                        }
                        self.error = None;
                    }
                    Err(err) => {
                        warn!("task {id} delete failed: {err}");
                        self.error = Some("Failed to delete task".into());
                    }
                }
                Effect::None
            }
            Msg::Logout => {
                if self.logging_out {
                    return Effect::None;
                }
                self.logging_out = true;
                let api = self.api.clone();
                Effect::perform(async move {
                    if let Err(err) = api.logout().await {
                        debug!("logout notification failed: {err}");
                    }
                    Msg::LoggedOut
                })
            }
            Msg::LoggedOut => {
                self.api.session().clear();
                Effect::Navigate(Route::Login)
            }
            Msg::GoTo(route) => Effect::Navigate(route),
        }
    }

    pub fn view(&self) -> Node<Msg> {
        if self.loading {
            return p([class("p-4")], [text("Loading tasks...")]);
        }
        div(
            [class("max-w-5xl mx-auto p-6")],
            [
                div(
                    [class("flex justify-between items-center mb-6")],
                    [
                        h1([class("text-2xl font-bold text-[#FF2D20]")], [text("TaskMate Dashboard")]),
                        div(
                            [class("space-x-3")],
                            [
                                button([on_click(|_| Msg::GoTo(Route::Profile))], [text("Update Profile")]),
                                button(
                                    [on_click(|_| Msg::Logout), disabled(self.logging_out)],
                                    [text("Logout")],
                                ),
                            ],
                        ),
                    ],
                ),
                match &self.error {
                    Some(error) => p([class("text-red-600 mb-4")], [text(error)]),
                    None => span([], []),
                },
                self.view_create_form(),
                ul(
                    [class("bg-white shadow rounded divide-y")],
                    self.tasks.iter().map(|task| self.view_task(task)),
                ),
            ],
        )
    }

    fn view_create_form(&self) -> Node<Msg> {
        div(
            [class("bg-white p-4 shadow rounded mb-6")],
            [
                input(
                    [
                        placeholder("Task title"),
                        value(&self.new_title),
                        on_input(|event| Msg::SetNewTitle(event.value())),
                    ],
                    [],
                ),
                input(
                    [
                        placeholder("Task description"),
                        value(&self.new_description),
                        on_input(|event| Msg::SetNewDescription(event.value())),
                    ],
                    [],
                ),
                button(
                    [on_click(|_| Msg::Create), disabled(self.creating)],
                    [text("Add Task")],
                ),
            ],
        )
    }

    fn view_task(&self, task: &Task) -> Node<Msg> {
        let id = task.id;
        let busy = self.is_busy(id);

        if let Some(buffer) = self.editing.as_ref().filter(|b| b.id == id) {
            return li(
                [class("p-3 flex gap-2")],
                [
                    input(
                        [value(&buffer.title), on_input(|event| Msg::SetEditTitle(event.value()))],
                        [],
                    ),
                    input(
                        [
                            value(&buffer.description),
                            on_input(|event| Msg::SetEditDescription(event.value())),
                        ],
                        [],
                    ),
                    button([on_click(|_| Msg::SaveEdit), disabled(busy)], [text("Save")]),
                    button([on_click(|_| Msg::CancelEdit)], [text("Cancel")]),
                ],
            );
        }

        li(
            [class("p-3 flex gap-2 items-center")],
            [
                button(
                    [on_click(move |_| Msg::ToggleCompleted(id)), disabled(busy)],
                    [text(if task.is_completed { "☑" } else { "☐" })],
                ),
                span(
                    [class(if task.is_completed { "flex-1 line-through" } else { "flex-1" })],
                    [text(&task.title)],
                ),
                span(
                    [class("flex-1 text-gray-600")],
                    [text(task.description().unwrap_or("—"))],
                ),
                button([on_click(move |_| Msg::StartEdit(id)), disabled(busy)], [text("Edit")]),
                button([on_click(move |_| Msg::Delete(id)), disabled(busy)], [text("Delete")]),
            ],
        )
    }
}

//! Wire types for the TaskMate REST API.
//!
//! Every request and response body exchanged with the backend is described
//! here so the frontend never touches untyped JSON outside the HTTP wrapper.

mod auth;
mod task;

pub use auth::{AuthToken, Credentials, OAuthProvider, Profile, ProfileUpdate, Registration};
pub use task::{NewTask, Task, TaskEnvelope, TaskId, TaskListing, TaskPatch};

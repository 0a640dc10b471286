use serde::{Deserialize, Serialize};

use crate::error::ValidationFailure;

const NAME_MAX_LEN: usize = 50;
const TITLE_MAX_LEN: usize = 200;
const CONTENT_MAX_LEN: usize = 10000;

/// Board post: `{"id", "name", "title", "content"}`.
///
/// Plain data holder. The record itself enforces nothing; request types
/// validate input before a `Board` is built from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    id: i32,
    name: String,
    title: String,
    content: String,
}

/// Request structure for creating a new board post
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
    pub title: String,
    pub content: String,
}

/// Request structure for updating a board post; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBoardRequest {
    pub name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Board {
    pub fn new(id: i32, name: String, title: String, content: String) -> Self {
        Board {
            id,
            name,
            title,
            content,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.set_id(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(title);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.set_content(content);
        self
    }

    /// Apply the supplied fields of an update request
    pub fn apply(&mut self, request: UpdateBoardRequest) {
        if let Some(name) = request.get_normalized_name() {
            self.set_name(name);
        }

        if let Some(title) = request.get_normalized_title() {
            self.set_title(title);
        }

        if let Some(content) = request.content {
            self.set_content(content);
        }
    }
}

fn check_text(
    failure: &mut ValidationFailure,
    field: &str,
    value: &str,
    max_len: usize,
) {
    if value.trim().is_empty() {
        failure.push(field, "must not be blank");
    } else if value.chars().count() > max_len {
        failure.push(field, format!("must be at most {} characters", max_len));
    }
}

impl CreateBoardRequest {
    /// Validate the create request, reporting every offending field in order
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        let mut failure = ValidationFailure::new();

        check_text(&mut failure, "name", &self.name, NAME_MAX_LEN);
        check_text(&mut failure, "title", &self.title, TITLE_MAX_LEN);
        check_text(&mut failure, "content", &self.content, CONTENT_MAX_LEN);

        failure.into_result()
    }

    /// Convert to a Board entity with the given id
    pub fn into_board(self, id: i32) -> Board {
        Board::new(
            id,
            self.name.trim().to_string(),
            self.title.trim().to_string(),
            self.content,
        )
    }
}

impl UpdateBoardRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.title.is_none() && self.content.is_none()
    }

    /// Validate only the fields that were supplied
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        let mut failure = ValidationFailure::new();

        if let Some(ref name) = self.name {
            check_text(&mut failure, "name", name, NAME_MAX_LEN);
        }
        if let Some(ref title) = self.title {
            check_text(&mut failure, "title", title, TITLE_MAX_LEN);
        }
        if let Some(ref content) = self.content {
            check_text(&mut failure, "content", content, CONTENT_MAX_LEN);
        }

        failure.into_result()
    }

    /// Get normalized name (trimmed)
    pub fn get_normalized_name(&self) -> Option<String> {
        self.name.as_ref().map(|n| n.trim().to_string())
    }

    /// Get normalized title (trimmed)
    pub fn get_normalized_title(&self) -> Option<String> {
        self.title.as_ref().map(|t| t.trim().to_string())
    }
}

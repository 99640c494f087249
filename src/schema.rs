// Struct representing the request body for creating an account
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SignupSchema {
    pub name: String,
    pub email: String,
    pub password: String,
}

// Struct representing the request body for signing in
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct LoginSchema {
    pub email: Option<String>,
    pub password: Option<String>,
}

// Struct representing the request body for creating a new Todo
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CreateTodoSchema {
    pub title: String,
}

// Struct representing the request body for updating a Todo.
// Omitted fields keep their stored values.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct UpdateTodoSchema {
    pub id: i64,
    pub title: Option<String>,
    pub completed: Option<bool>,
}

// Struct representing the request body for deleting a Todo
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct DeleteTodoSchema {
    pub id: i64,
}

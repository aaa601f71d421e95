//! Machine-readable API description.
//!
//! Serves an OpenAPI 3.0 document describing every endpoint at
//! `GET /openapi.json`. The document is assembled by hand and covers the
//! same surface the routers expose; when a route changes, this file changes
//! with it.

use std::sync::LazyLock;

use axum::Json;
use serde_json::{Value, json};

static DOCUMENT: LazyLock<Value> = LazyLock::new(build_document);

/// `GET /openapi.json`
pub async fn openapi() -> Json<Value> {
    Json(DOCUMENT.clone())
}

/// Inline object schema from `(field, type, description)` triples.
fn object_schema(fields: &[(&str, &str, &str)]) -> Value {
    let mut properties = serde_json::Map::new();
    for (name, ty, description) in fields {
        properties.insert(
            (*name).to_owned(),
            json!({ "type": ty, "description": description }),
        );
    }
    json!({ "type": "object", "properties": properties })
}

fn json_body(schema: Value) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": schema } }
    })
}

fn bearer() -> Value {
    json!([{ "bearerAuth": [] }])
}

fn build_document() -> Value {
    let profile_body = json_body(object_schema(&[
        ("name", "string", "User's Name"),
        ("email", "string", "User's Email"),
        ("phone", "string", "User's Phone"),
    ]));

    let id_parameter = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "ID of the user profile",
        "schema": { "type": "string", "format": "uuid" }
    });

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "userdir API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "User account registration, login, and profile management"
        },
        "components": {
            "securitySchemes": {
                "bearerAuth": {
                    "type": "http",
                    "scheme": "bearer",
                    "bearerFormat": "JWT"
                }
            }
        },
        "paths": {
            "/auth/register": {
                "post": {
                    "tags": ["auth"],
                    "summary": "Register a new user",
                    "requestBody": json_body(object_schema(&[
                        ("username", "string", "Username of the user"),
                        ("email", "string", "Email address of the user"),
                        ("password", "string", "Password for the user"),
                    ])),
                    "responses": {
                        "201": { "description": "User registered successfully" },
                        "400": { "description": "Validation failure or username already exists" },
                        "500": { "description": "Registration failed" }
                    }
                }
            },
            "/auth/login": {
                "post": {
                    "tags": ["auth"],
                    "summary": "Login a user and return a bearer token",
                    "requestBody": json_body(object_schema(&[
                        ("username", "string", "Username of the user"),
                        ("password", "string", "Password for the user"),
                    ])),
                    "responses": {
                        "200": { "description": "Access token" },
                        "400": { "description": "Invalid credentials" },
                        "401": { "description": "Invalid credentials" },
                        "500": { "description": "Login failed" }
                    }
                }
            },
            "/users": {
                "post": {
                    "tags": ["users"],
                    "summary": "Create a new user profile",
                    "security": bearer(),
                    "requestBody": profile_body.clone(),
                    "responses": {
                        "201": { "description": "The newly created user profile" },
                        "400": { "description": "Validation failure" },
                        "500": { "description": "Failed to create user" }
                    }
                },
                "get": {
                    "tags": ["users"],
                    "summary": "Get all user profiles with pagination and sorting",
                    "security": bearer(),
                    "parameters": [
                        {
                            "name": "page",
                            "in": "query",
                            "schema": { "type": "integer", "minimum": 1 },
                            "description": "Page number for pagination"
                        },
                        {
                            "name": "limit",
                            "in": "query",
                            "schema": { "type": "integer", "maximum": 100 },
                            "description": "Maximum number of results per page"
                        },
                        {
                            "name": "sortBy",
                            "in": "query",
                            "schema": {
                                "type": "string",
                                "enum": ["name", "email", "createdAt", "updatedAt"]
                            },
                            "description": "Field to sort by"
                        },
                        {
                            "name": "sortOrder",
                            "in": "query",
                            "schema": { "type": "string", "enum": ["asc", "desc"] },
                            "description": "Sort order (asc or desc)"
                        }
                    ],
                    "responses": {
                        "200": { "description": "A list of user profiles" },
                        "400": { "description": "Invalid pagination or sort parameters" },
                        "500": { "description": "Failed to retrieve users" }
                    }
                }
            },
            "/users/{id}": {
                "get": {
                    "tags": ["users"],
                    "summary": "Get a user profile by ID",
                    "security": bearer(),
                    "parameters": [id_parameter.clone()],
                    "responses": {
                        "200": { "description": "The requested user profile" },
                        "404": { "description": "User not found" },
                        "500": { "description": "Failed to retrieve user" }
                    }
                },
                "put": {
                    "tags": ["users"],
                    "summary": "Update a user profile by ID",
                    "security": bearer(),
                    "parameters": [id_parameter.clone()],
                    "requestBody": profile_body,
                    "responses": {
                        "200": { "description": "The updated user profile" },
                        "404": { "description": "User not found" },
                        "500": { "description": "Failed to update user" }
                    }
                },
                "delete": {
                    "tags": ["users"],
                    "summary": "Delete a user profile by ID",
                    "security": bearer(),
                    "parameters": [id_parameter],
                    "responses": {
                        "204": { "description": "User profile deleted successfully" },
                        "404": { "description": "User not found" },
                        "500": { "description": "Failed to delete user" }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_every_route() {
        let doc = build_document();
        assert_eq!(doc["openapi"], "3.0.0");

        let paths = doc["paths"].as_object().unwrap();
        assert!(paths["/auth/register"]["post"].is_object());
        assert!(paths["/auth/login"]["post"].is_object());
        assert!(paths["/users"]["post"].is_object());
        assert!(paths["/users"]["get"].is_object());
        for method in ["get", "put", "delete"] {
            assert!(paths["/users/{id}"][method].is_object());
        }
    }

    #[test]
    fn profile_operations_require_the_bearer_scheme() {
        let doc = build_document();
        assert_eq!(
            doc["components"]["securitySchemes"]["bearerAuth"]["scheme"],
            "bearer"
        );

        let list = &doc["paths"]["/users"]["get"];
        assert!(list["security"][0]["bearerAuth"].is_array());

        // Registration and login are public.
        assert!(doc["paths"]["/auth/login"]["post"].get("security").is_none());
    }

    #[test]
    fn list_parameters_match_the_validated_query() {
        let doc = build_document();
        let names: Vec<&str> = doc["paths"]["/users"]["get"]["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["page", "limit", "sortBy", "sortOrder"]);
    }
}
